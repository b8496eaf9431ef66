//! Analysis engine tying extraction, coverage, ATS checks and alignment together

use crate::config::{Config, EngineConfig};
use crate::error::{Result, ResumeMatchError};
use crate::processing::alignment::{SectionAlignment, SemanticAligner};
use crate::processing::ats_checks::{
    AtsCheckSet, AtsChecker, AtsDiagnostics, StructureHints,
};
use crate::processing::coverage::{CoverageEntry, CoverageMatcher};
use crate::processing::embeddings::Embedder;
use crate::processing::keywords::KeywordExtractor;
use crate::processing::scoring;
use crate::processing::sections::SectionSegmenter;
use crate::processing::text_processor::normalize;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Output caps for the result lists
pub const MAX_MISSING_KEYWORDS: usize = 25;
pub const MAX_COVERAGE_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_score: f64,
    pub ats_score: f64,
    pub overall_score: f64,
    pub checks: AtsCheckSet,
    pub ats_diagnostics: AtsDiagnostics,
    pub section_alignment: Vec<SectionAlignment>,
}

/// Everything one analysis produces. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub missing_keywords: Vec<String>,
    pub coverage: Vec<CoverageEntry>,
    pub scores: ScoreBreakdown,
    pub suggestions: Vec<String>,
}

/// A result plus how the embeddings behind it were obtained
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    /// "provided", "fallback" or "none"
    pub embedding_backend: &'static str,
    pub processing_time_ms: u64,
}

pub struct MatchEngine {
    config: EngineConfig,
    extractor: KeywordExtractor,
    coverage: CoverageMatcher,
    ats: AtsChecker,
    segmenter: SectionSegmenter,
    aligner: SemanticAligner,
}

impl MatchEngine {
    pub fn new(config: EngineConfig, embedder: Embedder) -> Self {
        Self {
            coverage: CoverageMatcher::new(&config),
            aligner: SemanticAligner::new(embedder, config.max_missing_terms),
            extractor: KeywordExtractor::new(),
            ats: AtsChecker::new(),
            segmenter: SectionSegmenter::new(),
            config,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.engine.clone(), Embedder::from_config(&config.embedding))
    }

    /// Swap in a different keyword extractor, e.g. one with custom strategies
    pub fn with_keyword_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn embedder(&self) -> &Embedder {
        self.aligner.embedder()
    }

    /// Score a resume against a job description. Fails only when either
    /// text is empty after normalization.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult> {
        self.analyze_with_hints(resume_text, job_description, &StructureHints::default())
            .await
            .map(|analysis| analysis.result)
    }

    pub async fn analyze_with_hints(
        &self,
        resume_text: &str,
        job_description: &str,
        hints: &StructureHints,
    ) -> Result<Analysis> {
        let start_time = Instant::now();

        let resume = normalize(resume_text);
        let job = normalize(job_description);
        if resume.is_empty() {
            return Err(ResumeMatchError::InvalidInput("resume text is empty".to_string()));
        }
        if job.is_empty() {
            return Err(ResumeMatchError::InvalidInput(
                "job description text is empty".to_string(),
            ));
        }

        info!(
            "Analyzing resume ({} chars) against job description ({} chars)",
            resume.chars().count(),
            job.chars().count()
        );

        let keywords = self.extractor.extract(&job, self.config.keyword_limit);
        debug!("Extracted {} keywords", keywords.len());

        let coverage = self.coverage.compute(&resume, &keywords);
        let checks = self.ats.evaluate(resume_text, hints);
        let ats_score = checks.score();
        let ats_diagnostics = self.ats.diagnose(resume_text, &checks);

        // Segmentation needs the original line structure
        let sections = self.segmenter.segment(resume_text);
        let alignment = self.aligner.align(&sections, &job).await;

        let avg_section = scoring::average_similarity(&alignment.alignments);
        let overall_score = scoring::overall_score(coverage.keyword_score, ats_score, avg_section);
        let summary = scoring::summary(
            coverage.keyword_score,
            ats_score,
            avg_section,
            overall_score,
            coverage.missing.len(),
        );
        let suggestions =
            scoring::suggestions(&coverage.missing, coverage.matched_count(), keywords.len());

        let mut missing_keywords = coverage.missing;
        missing_keywords.truncate(MAX_MISSING_KEYWORDS);
        let mut entries = coverage.coverage;
        entries.truncate(MAX_COVERAGE_ENTRIES);

        let embedding_backend = alignment.backend();
        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis complete: overall {:.1}% in {} ms", overall_score, processing_time_ms);

        Ok(Analysis {
            result: AnalysisResult {
                summary,
                missing_keywords,
                coverage: entries,
                scores: ScoreBreakdown {
                    keyword_score: coverage.keyword_score,
                    ats_score,
                    overall_score,
                    checks,
                    ats_diagnostics,
                    section_alignment: alignment.alignments,
                },
                suggestions,
            },
            embedding_backend,
            processing_time_ms,
        })
    }
}
