//! The matching engine: extraction, coverage, ATS checks, alignment and scoring

pub mod alignment;
pub mod analyzer;
pub mod ats_checks;
pub mod coverage;
pub mod embeddings;
pub mod keywords;
pub mod model_manager;
pub mod scoring;
pub mod sections;
pub mod text_processor;

pub use analyzer::{Analysis, AnalysisResult, MatchEngine, ScoreBreakdown};
