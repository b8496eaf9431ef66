//! Report envelope around an analysis result

use crate::processing::analyzer::{Analysis, AnalysisResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What gets rendered or saved: the engine result plus run metadata.
/// The timestamp lives here so the result itself stays reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    pub resume_file: String,
    pub job_file: String,
    /// "provided", "fallback" or "none"
    pub embedding_backend: String,
    pub embedding_provider: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    VeryGood,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ScoreBand::Excellent,
            s if s >= 80.0 => ScoreBand::VeryGood,
            s if s >= 70.0 => ScoreBand::Good,
            s if s >= 60.0 => ScoreBand::Fair,
            s if s >= 50.0 => ScoreBand::BelowAverage,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT",
            ScoreBand::VeryGood => "VERY GOOD",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::BelowAverage => "BELOW AVG",
            ScoreBand::Poor => "POOR",
        }
    }
}

impl AnalysisReport {
    pub fn new(
        analysis: Analysis,
        resume_file: impl Into<String>,
        job_file: impl Into<String>,
        embedding_provider: impl Into<String>,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.into(),
                job_file: job_file.into(),
                embedding_backend: analysis.embedding_backend.to_string(),
                embedding_provider: embedding_provider.into(),
                processing_time_ms: analysis.processing_time_ms,
            },
            result: analysis.result,
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.result.scores.overall_score)
    }

    /// Coverage entries that were found in the resume
    pub fn matched_keywords(&self) -> impl Iterator<Item = &str> {
        self.result
            .coverage
            .iter()
            .filter(|entry| entry.in_resume)
            .map(|entry| entry.keyword.term.as_str())
    }
}
