//! Integration tests for the resume matcher

use async_trait::async_trait;
use resume_match::config::{Config, EngineConfig, OutputFormat};
use resume_match::input::file_detector::FileType;
use resume_match::input::InputManager;
use resume_match::output::{AnalysisReport, ReportGenerator};
use resume_match::processing::ats_checks::StructureHints;
use resume_match::processing::coverage::CoverageMatcher;
use resume_match::processing::embeddings::{Embedder, EmbeddingProvider};
use resume_match::processing::keywords::{Keyword, KeywordCategory};
use resume_match::{MatchEngine, Result, ResumeMatchError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const FALLBACK_DIMS: usize = 256;

/// Deterministic two-dimensional vectors derived from text length
struct LengthProvider;

#[async_trait]
impl EmbeddingProvider for LengthProvider {
    fn name(&self) -> &str {
        "length"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| vec![1.0, (t.len() % 7) as f32])
            .collect())
    }
}

struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(ResumeMatchError::Embedding("backend unavailable".to_string()))
    }
}

struct SlowProvider;

#[async_trait]
impl EmbeddingProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![vec![1.0]; texts.len()])
    }
}

fn engine_with(provider: Option<Arc<dyn EmbeddingProvider>>) -> MatchEngine {
    let embedder = Embedder::new(provider, FALLBACK_DIMS, Duration::from_millis(50));
    MatchEngine::new(EngineConfig::default(), embedder)
}

async fn fixture_texts() -> (String, String) {
    let manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    (resume, job)
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("Kafka ingestion pipeline"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("backend services"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let manager = InputManager::new();

    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(ResumeMatchError::UnsupportedFormat(_))));

    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(ResumeMatchError::InvalidInput(_))));

    let job_only = InputManager::new().with_allowed(&[FileType::Text]);
    let result = job_only.extract_text(Path::new("tests/fixtures/sample_resume.md")).await;
    assert!(matches!(result, Err(ResumeMatchError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_end_to_end_with_fallback_embeddings() {
    let (resume, job) = fixture_texts().await;
    let engine = MatchEngine::from_config(&Config::default());

    let analysis = engine
        .analyze_with_hints(&resume, &job, &StructureHints::default())
        .await
        .unwrap();
    let result = &analysis.result;
    let scores = &result.scores;

    assert_eq!(analysis.embedding_backend, "fallback");
    assert!(scores.keyword_score > 0.0);
    assert!((0.0..=100.0).contains(&scores.overall_score));
    assert!(scores.checks.has_sections);
    assert!(scores.checks.has_contact_info);
    assert!(scores.checks.bullet_usage);
    assert!(!result.suggestions.is_empty() && result.suggestions.len() <= 5);

    let sections: Vec<&str> = scores
        .section_alignment
        .iter()
        .map(|a| a.section.as_str())
        .collect();
    for expected in ["summary", "skills", "experience", "education"] {
        assert!(sections.contains(&expected), "missing section {}", expected);
    }
    assert!(scores
        .section_alignment
        .windows(2)
        .all(|pair| pair[0].similarity >= pair[1].similarity));

    let matched: Vec<&str> = result
        .coverage
        .iter()
        .filter(|c| c.in_resume)
        .map(|c| c.keyword.term.as_str())
        .collect();
    assert!(matched.contains(&"kafka"));
    assert!(matched.contains(&"postgresql"));
}

#[tokio::test]
async fn test_analysis_is_idempotent() {
    let (resume, job) = fixture_texts().await;
    let engine = engine_with(None);

    let first = engine.analyze(&resume, &job).await.unwrap();
    let second = engine.analyze(&resume, &job).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_provider_vectors_are_used() {
    let (resume, job) = fixture_texts().await;
    let engine = engine_with(Some(Arc::new(LengthProvider)));

    let analysis = engine
        .analyze_with_hints(&resume, &job, &StructureHints::default())
        .await
        .unwrap();
    assert_eq!(analysis.embedding_backend, "provided");
    assert_eq!(engine.embedder().provider_name(), "length");
}

#[tokio::test]
async fn test_failing_provider_matches_fallback() {
    let (resume, job) = fixture_texts().await;

    let failing = engine_with(Some(Arc::new(FailingProvider)));
    let fallback = engine_with(None);

    let degraded = failing
        .analyze_with_hints(&resume, &job, &StructureHints::default())
        .await
        .unwrap();
    assert_eq!(degraded.embedding_backend, "fallback");
    assert_eq!(degraded.result, fallback.analyze(&resume, &job).await.unwrap());
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let (resume, job) = fixture_texts().await;
    let engine = engine_with(Some(Arc::new(SlowProvider)));

    let started = std::time::Instant::now();
    let analysis = engine
        .analyze_with_hints(&resume, &job, &StructureHints::default())
        .await
        .unwrap();
    assert_eq!(analysis.embedding_backend, "fallback");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_zero_overlap() {
    let engine = engine_with(None);
    let resume = "Pastry chef baking croissants, baguettes and sourdough every morning.";
    let job = "Kubernetes Terraform Ansible orchestration. Prometheus monitoring, Grafana dashboards, Elasticsearch clusters.";

    let result = engine.analyze(resume, job).await.unwrap();

    assert_eq!(result.scores.keyword_score, 0.0);
    assert!(!result.coverage.is_empty());
    assert!(result.coverage.iter().all(|c| !c.in_resume && c.frequency == 0));
    assert_eq!(result.missing_keywords.len(), result.coverage.len().min(25));
}

#[test]
fn test_keyword_coverage_example() {
    let matcher = CoverageMatcher::new(&EngineConfig::default());
    let keywords: Vec<Keyword> = ["java", "spring boot", "kafka", "python"]
        .iter()
        .map(|term| Keyword::new(*term, KeywordCategory::Other, 1.0))
        .collect();

    let report = matcher.compute(
        "Experienced with Java, Spring Boot, and Kafka at scale.",
        &keywords,
    );
    assert_eq!(report.missing, vec!["python"]);
    assert_eq!(report.keyword_score, 75.0);
}

#[tokio::test]
async fn test_empty_job_description_is_rejected() {
    let engine = engine_with(None);
    let result = engine.analyze("Jane Doe, Rust engineer", " \n\t ").await;
    assert!(matches!(result, Err(ResumeMatchError::InvalidInput(_))));
}

#[tokio::test]
async fn test_report_json_envelope() {
    let (resume, job) = fixture_texts().await;
    let engine = engine_with(None);
    let analysis = engine
        .analyze_with_hints(&resume, &job, &StructureHints::default())
        .await
        .unwrap();
    let overall = analysis.result.scores.overall_score;

    let report = AnalysisReport::new(
        analysis,
        "tests/fixtures/sample_resume.txt",
        "tests/fixtures/job_description.txt",
        engine.embedder().provider_name(),
    );
    let json = ReportGenerator::with_options(false, false, false, true)
        .generate_report(&report, &OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["embedding_backend"], "fallback");
    assert_eq!(value["metadata"]["embedding_provider"], "hashing");
    assert_eq!(value["result"]["scores"]["overall_score"].as_f64(), Some(overall));
    assert!(value["result"]["missing_keywords"].is_array());
}
