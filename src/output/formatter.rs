//! Output formatters for console, JSON and markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{AnalysisReport, ScoreBand};
use crate::processing::ats_checks::AtsCheckSet;
use crate::processing::scoring::{average_similarity, ATS_WEIGHT, KEYWORD_WEIGHT, SECTION_WEIGHT};
use colored::{Color, Colorize};
use std::path::Path;

/// Console view shows this many missing keywords unless detailed
const CONSOLE_MISSING_PREVIEW: usize = 10;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and optional detail sections
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for tooling and structured consumers
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for a format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, band: ScoreBand) -> String {
        let color = match band {
            ScoreBand::Excellent => Color::Green,
            ScoreBand::VeryGood => Color::BrightGreen,
            ScoreBand::Good => Color::Yellow,
            ScoreBand::Fair => Color::BrightYellow,
            ScoreBand::BelowAverage => Color::Red,
            ScoreBand::Poor => Color::BrightRed,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn check_mark(&self, passed: bool) -> String {
        match (passed, self.use_colors) {
            (true, true) => "✓".color(Color::Green).to_string(),
            (false, true) => "✗".color(Color::Red).to_string(),
            (true, false) => "[x]".to_string(),
            (false, false) => "[ ]".to_string(),
        }
    }

    fn format_details(&self, report: &AnalysisReport, output: &mut String) {
        let scores = &report.result.scores;

        output.push_str(&self.format_header("📋 ATS Checks", 3));
        for (name, passed) in scores.checks.iter() {
            output.push_str(&format!(
                "  {} {}\n",
                self.check_mark(passed),
                name.replace('_', " ")
            ));
        }

        let diagnostics = &scores.ats_diagnostics;
        output.push_str(&format!("  Compatibility: {}\n", diagnostics.compatibility));
        for issue in &diagnostics.issues {
            output.push_str(&format!("  {} {}\n", self.colorize("!", Color::Yellow), issue));
        }
        for recommendation in &diagnostics.recommendations {
            output.push_str(&format!("  → {}\n", recommendation));
        }

        if !scores.section_alignment.is_empty() {
            output.push_str(&self.format_header("🎯 Section Alignment", 3));
            for alignment in &scores.section_alignment {
                output.push_str(&format!(
                    "  {:<16} {:>5.1}%\n",
                    alignment.section, alignment.similarity
                ));
                if !alignment.missing_terms.is_empty() {
                    output.push_str(&format!(
                        "    {} {}\n",
                        self.colorize("missing:", Color::BrightBlack),
                        alignment.missing_terms.join(", ")
                    ));
                }
            }
        }

        if !report.result.coverage.is_empty() {
            output.push_str(&self.format_header("🔍 Keyword Coverage", 3));
            for entry in &report.result.coverage {
                let term = if entry.in_resume {
                    self.colorize(&entry.keyword.term, Color::Green)
                } else {
                    self.colorize(&entry.keyword.term, Color::Red)
                };
                output.push_str(&format!(
                    "  {} {} ({}, x{})\n",
                    self.check_mark(entry.in_resume),
                    term,
                    entry.keyword.category,
                    entry.frequency
                ));
                for snippet in &entry.context_snippets {
                    output.push_str(&format!(
                        "      {}\n",
                        self.colorize(&format!("\"{}\"", snippet.trim()), Color::BrightBlack)
                    ));
                }
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;
        let scores = &result.scores;

        // Header
        output.push_str(&self.format_header("📊 RESUME MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            file_label(&report.metadata.resume_file),
            file_label(&report.metadata.job_file)
        ));

        // Executive Summary
        output.push_str(&self.format_header("Executive Summary", 2));
        output.push_str(&format!(
            "Overall Score: {:.1}% {}\n",
            scores.overall_score,
            self.format_score_badge(report.band())
        ));
        output.push_str(&format!("{}\n", self.colorize(&result.summary, Color::Cyan)));

        // Score Breakdown
        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!(
            "🔍 Keyword Coverage: {:.1}% (weight: {:.1}%)\n",
            scores.keyword_score,
            KEYWORD_WEIGHT * 100.0
        ));
        output.push_str(&format!(
            "📋 ATS Compatibility: {:.1}% (weight: {:.1}%) | {}/{} checks passed\n",
            scores.ats_score,
            ATS_WEIGHT * 100.0,
            scores.checks.passed(),
            AtsCheckSet::TOTAL
        ));
        output.push_str(&format!(
            "🎯 Section Alignment: {:.1}% (weight: {:.1}%)\n",
            average_similarity(&scores.section_alignment),
            SECTION_WEIGHT * 100.0
        ));

        // Missing keywords
        if !result.missing_keywords.is_empty() {
            output.push_str(&self.format_header("🚨 Missing Keywords", 2));
            let shown = if self.detailed {
                result.missing_keywords.len()
            } else {
                CONSOLE_MISSING_PREVIEW.min(result.missing_keywords.len())
            };
            for keyword in &result.missing_keywords[..shown] {
                output.push_str(&format!("  • {}\n", self.colorize(keyword, Color::Red)));
            }
            if shown < result.missing_keywords.len() {
                let more = format!(
                    "... and {} more (use --detailed)",
                    result.missing_keywords.len() - shown
                );
                output.push_str(&format!("  {}\n", self.colorize(&more, Color::BrightBlack)));
            }
        }

        // Suggestions
        output.push_str(&self.format_header("💡 Suggestions", 2));
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        if self.detailed {
            output.push_str(&self.format_header("📊 Detailed Analysis", 2));
            self.format_details(report, &mut output);
        }

        // Footer
        output.push_str(&format!(
            "\n{} Generated by resume-match v{} | Embeddings: {} ({})\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.matcher_version,
            report.metadata.embedding_provider,
            report.metadata.embedding_backend
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::Excellent => "🟢 Excellent",
            ScoreBand::VeryGood => "🟡 Very Good",
            ScoreBand::Good => "🟠 Good",
            ScoreBand::Fair => "🔴 Fair",
            ScoreBand::BelowAverage => "🔴 Below Average",
            ScoreBand::Poor => "🔴 Poor",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.result;
        let scores = &result.scores;

        output.push_str("# 📊 Resume Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_label(&report.metadata.resume_file),
                file_label(&report.metadata.job_file)
            ));
        }

        // Executive Summary
        output.push_str("## Executive Summary\n\n");
        output.push_str(&format!(
            "**Overall Score:** {:.1}% {}\n\n",
            scores.overall_score,
            Self::markdown_score_badge(report.band())
        ));
        output.push_str(&format!("> {}\n\n", result.summary));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!(
            "| 🔍 Keyword Coverage | {:.1}% | {:.1}% |\n",
            scores.keyword_score,
            KEYWORD_WEIGHT * 100.0
        ));
        output.push_str(&format!(
            "| 📋 ATS Compatibility | {:.1}% | {:.1}% |\n",
            scores.ats_score,
            ATS_WEIGHT * 100.0
        ));
        output.push_str(&format!(
            "| 🎯 Section Alignment | {:.1}% | {:.1}% |\n\n",
            average_similarity(&scores.section_alignment),
            SECTION_WEIGHT * 100.0
        ));

        if !result.missing_keywords.is_empty() {
            output.push_str("## 🚨 Missing Keywords\n\n");
            output.push_str(&format!("`{}`\n\n", result.missing_keywords.join("`, `")));
        }

        output.push_str("## 💡 Suggestions\n\n");
        for (i, suggestion) in result.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }
        output.push('\n');

        output.push_str("## 📋 ATS Checks\n\n");
        for (name, passed) in scores.checks.iter() {
            let mark = if passed { "x" } else { " " };
            output.push_str(&format!("- [{}] {}\n", mark, name.replace('_', " ")));
        }
        output.push('\n');

        let diagnostics = &scores.ats_diagnostics;
        output.push_str(&format!("**Compatibility:** {}\n\n", diagnostics.compatibility));
        if !diagnostics.issues.is_empty() {
            output.push_str("**Issues:**\n\n");
            for issue in &diagnostics.issues {
                output.push_str(&format!("- {}\n", issue));
            }
            output.push('\n');
        }
        if !diagnostics.recommendations.is_empty() {
            output.push_str("**Recommendations:**\n\n");
            for recommendation in &diagnostics.recommendations {
                output.push_str(&format!("- {}\n", recommendation));
            }
            output.push('\n');
        }

        if !scores.section_alignment.is_empty() {
            output.push_str("## 🎯 Section Alignment\n\n");
            output.push_str("| Section | Similarity | Missing Terms |\n");
            output.push_str("|---------|------------|---------------|\n");
            for alignment in &scores.section_alignment {
                output.push_str(&format!(
                    "| {} | {:.1}% | {} |\n",
                    alignment.section,
                    alignment.similarity,
                    alignment.missing_terms.join(", ")
                ));
            }
            output.push('\n');
        }

        if !result.coverage.is_empty() {
            output.push_str("## 🔍 Keyword Coverage\n\n");
            output.push_str("| Keyword | Category | Found | Frequency |\n");
            output.push_str("|---------|----------|-------|-----------|\n");
            for entry in &result.coverage {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    entry.keyword.term,
                    entry.keyword.category,
                    if entry.in_resume { "✅" } else { "❌" },
                    entry.frequency
                ));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by resume-match v{} using {} embeddings ({})*\n",
                report.metadata.matcher_version,
                report.metadata.embedding_provider,
                report.metadata.embedding_backend
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(
        &self,
        report: &AnalysisReport,
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_match{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_match{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_match{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::processing::ats_checks::StructureHints;
    use crate::processing::embeddings::Embedder;
    use crate::processing::MatchEngine;
    use tempfile::TempDir;

    const RESUME: &str = "Jane Doe\njane@example.com | +1 555 123 4567\n\nSUMMARY\nBackend engineer.\n\nSKILLS\n- Rust, Kafka\n\nEXPERIENCE\n- Built Kafka pipelines in Rust\n";
    const JOB: &str = "Rust engineer with Kafka, Kubernetes and Terraform experience.";

    async fn sample_report() -> AnalysisReport {
        let engine = MatchEngine::new(EngineConfig::default(), Embedder::fallback_only(256));
        let analysis = engine
            .analyze_with_hints(RESUME, JOB, &StructureHints::default())
            .await
            .unwrap();
        AnalysisReport::new(analysis, "/tmp/jane.txt", "/tmp/job.txt", "hashing")
    }

    #[tokio::test]
    async fn test_console_without_colors() {
        let report = sample_report().await;
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();

        assert!(output.contains("█ 📊 RESUME MATCH ANALYSIS"));
        assert!(output.contains("Resume: jane.txt | Job: job.txt"));
        assert!(output.contains(&report.result.summary));
        assert!(output.contains(&format!("[{}]", report.band().label())));
        assert!(!output.contains("Detailed Analysis"));
        assert!(!output.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_console_detailed_lists_checks() {
        let report = sample_report().await;
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();

        assert!(output.contains("Detailed Analysis"));
        assert!(output.contains("[x] has contact info"));
        assert!(output.contains("Section Alignment"));
        assert!(output.contains(&format!(
            "Compatibility: {}",
            report.result.scores.ats_diagnostics.compatibility
        )));
        assert!(output.contains("→ Consider adding LinkedIn or GitHub profile"));
    }

    #[tokio::test]
    async fn test_json_round_trips_through_serde() {
        let report = sample_report().await;
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["embedding_backend"], "fallback");
        assert_eq!(value["metadata"]["resume_file"], "/tmp/jane.txt");
        assert!(value["result"]["scores"]["overall_score"].is_number());
    }

    #[tokio::test]
    async fn test_markdown_sections() {
        let report = sample_report().await;
        let output = MarkdownFormatter::new(false).format_report(&report).unwrap();

        assert!(output.starts_with("# 📊 Resume Match Report"));
        assert!(output.contains("| Component | Score | Weight |"));
        assert!(output.contains("- [x] has sections"));
        assert!(output.contains("**Compatibility:**"));
        assert!(output.contains("- Consider adding LinkedIn or GitHub profile"));
        assert!(!output.contains("**Generated:**"));
    }

    #[tokio::test]
    async fn test_generator_dispatch_and_save() {
        let report = sample_report().await;
        let generator = ReportGenerator::with_options(false, false, true, true);
        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.contains("\n  \"metadata\""));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.json");
        save_report_to_file(&json, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "docs/jane_doe.pdf", false),
            "jane_doe_match.md"
        );
        let stamped = suggest_filename(&OutputFormat::Json, "jane.txt", true);
        assert!(stamped.starts_with("jane_match_") && stamped.ends_with(".json"));
    }
}
