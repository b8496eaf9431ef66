//! Section-to-job semantic alignment

use crate::processing::embeddings::{cosine_similarity, Embedder, EmbeddingOutcome};
use crate::processing::scoring::round_to_tenth;
use crate::processing::sections::Section;
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MIN_TERM_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAlignment {
    pub section: String,
    /// Cosine similarity scaled to 0-100, one decimal
    pub similarity: f64,
    pub missing_terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AlignmentReport {
    /// Sorted by similarity, highest first
    pub alignments: Vec<SectionAlignment>,
    /// Absent when there was nothing to embed
    pub outcome: Option<EmbeddingOutcome>,
}

impl AlignmentReport {
    pub fn backend(&self) -> &'static str {
        self.outcome.as_ref().map(EmbeddingOutcome::backend).unwrap_or("none")
    }
}

pub struct SemanticAligner {
    embedder: Embedder,
    processor: TextProcessor,
    max_missing_terms: usize,
}

impl SemanticAligner {
    pub fn new(embedder: Embedder, max_missing_terms: usize) -> Self {
        Self {
            embedder,
            processor: TextProcessor::new(),
            max_missing_terms,
        }
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub async fn align(&self, sections: &[Section], job_description: &str) -> AlignmentReport {
        if sections.is_empty() {
            return AlignmentReport {
                alignments: Vec::new(),
                outcome: None,
            };
        }

        // Sections first, job description last, in one batch
        let mut texts: Vec<String> = sections.iter().map(|s| s.content.clone()).collect();
        texts.push(job_description.to_string());

        let outcome = self.embedder.embed(&texts).await;
        let vectors = outcome.vectors();
        let (section_vectors, job_vector) = vectors.split_at(sections.len());
        let job_vector = job_vector.first().map(Vec::as_slice).unwrap_or(&[]);

        let jd_terms = self.job_terms(job_description);

        let mut alignments: Vec<SectionAlignment> = sections
            .iter()
            .zip(section_vectors)
            .map(|(section, vector)| {
                let cosine = cosine_similarity(vector, job_vector);
                SectionAlignment {
                    section: section.name.clone(),
                    similarity: round_to_tenth((cosine * 100.0).clamp(0.0, 100.0)),
                    missing_terms: self.missing_terms(&jd_terms, &section.content),
                }
            })
            .collect();

        alignments.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Aligned {} sections using the {} embedding backend",
            alignments.len(),
            outcome.backend()
        );

        AlignmentReport {
            alignments,
            outcome: Some(outcome),
        }
    }

    /// Distinct lower-cased job-description terms longer than three characters
    fn job_terms(&self, job_description: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.processor
            .plain_tokens(job_description)
            .into_iter()
            .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }

    fn missing_terms(&self, jd_terms: &[String], content: &str) -> Vec<String> {
        let content_lower = content.to_lowercase();
        jd_terms
            .iter()
            .filter(|term| !content_lower.contains(term.as_str()))
            .take(self.max_missing_terms)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::processing::embeddings::EmbeddingProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    /// Every section gets the same vector, so all similarities tie
    struct ConstantProvider;

    #[async_trait]
    impl EmbeddingProvider for ConstantProvider {
        fn name(&self) -> &str {
            "constant"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 1.0]; texts.len()])
        }
    }

    fn section(name: &str, content: &str) -> Section {
        Section {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_alignment_sorted_by_similarity() {
        let aligner = SemanticAligner::new(Embedder::fallback_only(256), 8);
        let sections = vec![
            section("education", "BSc Mathematics"),
            section("skills", "rust kafka kubernetes"),
        ];

        let report = aligner.align(&sections, "rust kafka kubernetes engineer").await;
        assert_eq!(report.backend(), "fallback");
        assert_eq!(report.alignments[0].section, "skills");
        assert!(report.alignments[0].similarity > report.alignments[1].similarity);
    }

    #[tokio::test]
    async fn test_fallback_similarity_is_exact() {
        let aligner = SemanticAligner::new(Embedder::fallback_only(256), 8);
        let sections = vec![section("skills", "rust kafka")];

        let first = aligner.align(&sections, "rust kafka").await;
        let second = aligner.align(&sections, "rust kafka").await;
        assert_eq!(first.alignments[0].similarity, 100.0);
        assert_eq!(first.alignments, second.alignments);
    }

    #[tokio::test]
    async fn test_ties_keep_segmentation_order() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(ConstantProvider);
        let embedder = Embedder::new(Some(provider), 16, Duration::from_secs(1));
        let aligner = SemanticAligner::new(embedder, 8);
        let sections = vec![
            section("other", "Jane"),
            section("summary", "Engineer"),
            section("skills", "Rust"),
        ];

        let report = aligner.align(&sections, "Rust engineer").await;
        let names: Vec<&str> = report.alignments.iter().map(|a| a.section.as_str()).collect();
        assert_eq!(names, vec!["other", "summary", "skills"]);
        assert_eq!(report.backend(), "provided");
    }

    #[tokio::test]
    async fn test_missing_terms() {
        let aligner = SemanticAligner::new(Embedder::fallback_only(256), 3);
        let sections = vec![section("skills", "Rust, Kafka")];

        let report = aligner
            .align(&sections, "Rust Kafka Kubernetes Terraform, Kubernetes AWS Ansible Python.")
            .await;
        assert_eq!(
            report.alignments[0].missing_terms,
            vec!["kubernetes", "terraform", "ansible"]
        );
    }

    #[tokio::test]
    async fn test_no_sections() {
        let aligner = SemanticAligner::new(Embedder::fallback_only(256), 8);
        let report = aligner.align(&[], "anything").await;
        assert!(report.alignments.is_empty());
        assert_eq!(report.backend(), "none");
    }
}
