//! ATS formatting heuristics

use crate::processing::scoring::round_to_tenth;
use crate::processing::text_processor::normalize;
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const MIN_LENGTH: usize = 300;
const MAX_LENGTH: usize = 9000;
const MIN_SECTION_MARKERS: usize = 3;

/// The fixed set of ATS checks. Field order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsCheckSet {
    pub has_sections: bool,
    pub has_contact_info: bool,
    pub no_photos_or_graphics: bool,
    pub reasonable_length: bool,
    pub bullet_usage: bool,
    pub no_tables_detected: bool,
    pub simple_headings: bool,
    pub no_excessive_columns: bool,
    pub no_header_footer_text: bool,
}

impl AtsCheckSet {
    pub const TOTAL: usize = 9;

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            ("has_sections", self.has_sections),
            ("has_contact_info", self.has_contact_info),
            ("no_photos_or_graphics", self.no_photos_or_graphics),
            ("reasonable_length", self.reasonable_length),
            ("bullet_usage", self.bullet_usage),
            ("no_tables_detected", self.no_tables_detected),
            ("simple_headings", self.simple_headings),
            ("no_excessive_columns", self.no_excessive_columns),
            ("no_header_footer_text", self.no_header_footer_text),
        ]
        .into_iter()
    }

    pub fn passed(&self) -> usize {
        self.iter().filter(|(_, ok)| *ok).count()
    }

    /// Percentage of passing checks, one decimal
    pub fn score(&self) -> f64 {
        round_to_tenth(self.passed() as f64 / Self::TOTAL as f64 * 100.0)
    }
}

/// Layout signals a format-aware ingestion layer can measure. Unknown
/// heading and header/footer values count as passing; an unknown column
/// value falls back to spacing in the raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureHints {
    pub simple_headings: Option<bool>,
    pub no_excessive_columns: Option<bool>,
    pub no_header_footer_text: Option<bool>,
}

/// Coarse verdict derived from the check score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl CompatibilityLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::Excellent,
            s if s >= 80.0 => Self::VeryGood,
            s if s >= 70.0 => Self::Good,
            s if s >= 60.0 => Self::Fair,
            s if s >= 50.0 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Human-readable findings reported next to the check set. They never
/// change the check score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsDiagnostics {
    pub compatibility: CompatibilityLevel,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// "linkedin" and/or "github"
    pub profiles: Vec<String>,
}

pub struct AtsChecker {
    section_markers: Vec<Regex>,
    email: Regex,
    phone: Regex,
    graphics: Regex,
    bullet: Regex,
    tables: Vec<Regex>,
    columns: Regex,
    spacing: Regex,
    dividers: Regex,
    profile_links: AhoCorasick,
}

/// Link prefix and the profile name it reveals
const PROFILE_LINKS: [(&str, &str); 2] = [
    ("linkedin.com/in/", "linkedin"),
    ("github.com/", "github"),
];

impl AtsChecker {
    pub fn new() -> Self {
        let section_markers = [
            r"summary|profile|objective",
            r"experience|employment|work history",
            r"education",
            r"skills|technologies|tooling",
            r"projects",
            r"certifications|licenses",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid section marker regex"))
        .collect();

        let tables = [
            r"\|\s*\w+\s*\|",
            r"\t\w+\t",
            r"[┌┐┘└├┤┬┴┼─│]",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid table regex"))
        .collect();

        Self {
            section_markers,
            email: Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+").expect("Invalid email regex"),
            phone: Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("Invalid phone regex"),
            graphics: Regex::new(
                r"(?i)\b(images?|img|figures?|charts?|graphs?|diagrams?|logos?|graphics?|visuals?|illustrations?)\b|\.(png|jpe?g|gif|svg|bmp|tiff?)\b",
            )
            .expect("Invalid graphics regex"),
            bullet: Regex::new(r"(?m)^\s*[•\-\*]").expect("Invalid bullet regex"),
            tables,
            columns: Regex::new(r"[ \t]{4,}\w+[ \t]{4,}").expect("Invalid column regex"),
            spacing: Regex::new(r" {3,}").expect("Invalid spacing regex"),
            dividers: Regex::new(r"#{2,}|={3,}|-{3,}|_{3,}").expect("Invalid divider regex"),
            profile_links: AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(PROFILE_LINKS.iter().map(|(pattern, _)| *pattern))
                .expect("Invalid profile link patterns"),
        }
    }

    /// Run every check. `raw` keeps its line breaks for the line-oriented
    /// checks; the rest read the normalized text.
    pub fn evaluate(&self, raw: &str, hints: &StructureHints) -> AtsCheckSet {
        let text = normalize(raw);

        AtsCheckSet {
            has_sections: self.has_sections(&text),
            has_contact_info: self.has_contact_info(&text),
            no_photos_or_graphics: !self.graphics.is_match(&text),
            reasonable_length: (MIN_LENGTH..=MAX_LENGTH).contains(&text.chars().count()),
            bullet_usage: self.bullet.is_match(raw),
            no_tables_detected: !self.tables.iter().any(|re| re.is_match(raw)),
            simple_headings: hints.simple_headings.unwrap_or(true),
            no_excessive_columns: hints
                .no_excessive_columns
                .unwrap_or_else(|| !self.columns.is_match(raw)),
            no_header_footer_text: hints.no_header_footer_text.unwrap_or(true),
        }
    }

    pub fn has_sections(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.section_markers
            .iter()
            .filter(|re| re.is_match(&lower))
            .count()
            >= MIN_SECTION_MARKERS
    }

    pub fn has_contact_info(&self, text: &str) -> bool {
        self.email.is_match(text) && self.phone.is_match(text)
    }

    /// Explain the formatting problems behind `checks` and the raw-text
    /// signals that fall outside the check set.
    pub fn diagnose(&self, raw: &str, checks: &AtsCheckSet) -> AtsDiagnostics {
        let text = normalize(raw);
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if !checks.has_sections {
            issues.push("Document lacks clear section structure".to_string());
        }

        let non_ascii: BTreeSet<char> = raw.chars().filter(|c| !c.is_ascii()).collect();
        if !non_ascii.is_empty() {
            issues.push(format!("Contains {} types of non-ASCII characters", non_ascii.len()));
        }
        let dividers = self.dividers.find_iter(raw).count();
        if dividers > 0 {
            issues.push(format!("Found {} decorative dividers", dividers));
        }
        if self.spacing.is_match(raw) {
            issues.push("Contains excessive spacing that may confuse ATS".to_string());
        }
        if raw.contains('\t') {
            issues.push("Contains tab characters - use spaces instead".to_string());
        }
        if !checks.no_excessive_columns {
            issues.push("Text appears to be laid out in columns".to_string());
            recommendations.push("Simplify document layout for better ATS parsing".to_string());
        }
        if !checks.no_photos_or_graphics {
            issues.push("References to graphics or images detected".to_string());
            recommendations
                .push("Remove graphics/images - use text descriptions instead".to_string());
        }
        if !checks.no_tables_detected {
            issues.push("Table formatting detected".to_string());
            recommendations
                .push("Convert tables to simple text format with clear labels".to_string());
        }
        if !non_ascii.is_empty() && dividers > 0 {
            recommendations.push("Use standard fonts and avoid complex formatting".to_string());
        }

        if !self.email.is_match(&text) {
            recommendations.push("Add a professional email address".to_string());
        }
        if !self.phone.is_match(&text) {
            recommendations.push("Include a phone number".to_string());
        }

        let mut profiles: Vec<String> = Vec::new();
        for m in self.profile_links.find_iter(raw) {
            let name = PROFILE_LINKS[m.pattern().as_usize()].1;
            if !profiles.iter().any(|p| p == name) {
                profiles.push(name.to_string());
            }
        }
        if profiles.is_empty() {
            recommendations.push("Consider adding LinkedIn or GitHub profile".to_string());
        }

        AtsDiagnostics {
            compatibility: CompatibilityLevel::from_score(checks.score()),
            issues,
            recommendations,
            profiles,
        }
    }
}

impl Default for AtsChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_length_boundaries() {
        let checker = AtsChecker::new();
        let hints = StructureHints::default();

        assert!(checker.evaluate(&filler(300), &hints).reasonable_length);
        assert!(checker.evaluate(&filler(9000), &hints).reasonable_length);
        assert!(!checker.evaluate(&filler(299), &hints).reasonable_length);
        assert!(!checker.evaluate(&filler(9001), &hints).reasonable_length);
    }

    #[test]
    fn test_contact_info_needs_email_and_phone() {
        let checker = AtsChecker::new();
        assert!(checker.has_contact_info("jane.doe@mail.com | +1 (555) 123-4567"));
        assert!(!checker.has_contact_info("jane.doe@mail.com"));
        assert!(!checker.has_contact_info("Call 555-123-4567"));
    }

    #[test]
    fn test_sections_need_three_markers() {
        let checker = AtsChecker::new();
        assert!(checker.has_sections("Summary ... Work History ... Education"));
        assert!(!checker.has_sections("Summary ... Education"));
    }

    #[test]
    fn test_line_checks_use_raw_text() {
        let checker = AtsChecker::new();
        let hints = StructureHints::default();

        let checks = checker.evaluate("Experience\n  • Built APIs\n- Led team", &hints);
        assert!(checks.bullet_usage);
        assert!(checks.no_tables_detected);

        let checks = checker.evaluate("Skills\tRust\tGo\n| Year | Role |", &hints);
        assert!(!checks.bullet_usage);
        assert!(!checks.no_tables_detected);

        let checks = checker.evaluate("Skills ┌──┐ grid", &hints);
        assert!(!checks.no_tables_detected);
    }

    #[test]
    fn test_graphics_detection() {
        let checker = AtsChecker::new();
        let hints = StructureHints::default();

        assert!(!checker.evaluate("See chart below", &hints).no_photos_or_graphics);
        assert!(!checker.evaluate("headshot.PNG attached", &hints).no_photos_or_graphics);
        assert!(checker.evaluate("Photography and paragraph writing", &hints).no_photos_or_graphics);
        assert!(checker.evaluate("Exported resume.pdf", &hints).no_photos_or_graphics);
    }

    #[test]
    fn test_score_and_hints() {
        let checker = AtsChecker::new();

        let checks = checker.evaluate("", &StructureHints::default());
        // graphics, tables and the three structural checks pass on empty text
        assert_eq!(checks.passed(), 5);
        assert_eq!(checks.score(), 55.6);

        let hints = StructureHints {
            simple_headings: Some(false),
            no_excessive_columns: None,
            no_header_footer_text: Some(false),
        };
        let checks = checker.evaluate("", &hints);
        assert!(!checks.simple_headings);
        assert!(checks.no_excessive_columns);
        assert_eq!(checks.score(), 33.3);
        assert_eq!(checks.iter().count(), AtsCheckSet::TOTAL);
    }

    #[test]
    fn test_column_spacing_without_hint() {
        let checker = AtsChecker::new();
        let columned = "Experience     Education\nAcme Corp    2019    State University";

        assert!(!checker.evaluate(columned, &StructureHints::default()).no_excessive_columns);
        let indented = "Skills\n\n    Rust\n\n    Go";
        assert!(checker.evaluate(indented, &StructureHints::default()).no_excessive_columns);

        let hints = StructureHints {
            no_excessive_columns: Some(true),
            ..StructureHints::default()
        };
        assert!(checker.evaluate(columned, &hints).no_excessive_columns);
    }

    #[test]
    fn test_diagnostics_explain_failures() {
        let checker = AtsChecker::new();
        let raw = "Jane Doe\tEngineer\nSummary   ====\nSee logo.png    2020    résumé";
        let checks = checker.evaluate(raw, &StructureHints::default());
        let diagnostics = checker.diagnose(raw, &checks);

        assert!(diagnostics.issues.contains(&"Document lacks clear section structure".to_string()));
        assert!(diagnostics.issues.contains(&"Contains 1 types of non-ASCII characters".to_string()));
        assert!(diagnostics.issues.contains(&"Found 1 decorative dividers".to_string()));
        assert!(diagnostics.issues.contains(&"Contains excessive spacing that may confuse ATS".to_string()));
        assert!(diagnostics.issues.contains(&"Contains tab characters - use spaces instead".to_string()));
        assert!(diagnostics.issues.contains(&"Text appears to be laid out in columns".to_string()));
        assert_eq!(
            &diagnostics.recommendations[..3],
            &[
                "Simplify document layout for better ATS parsing".to_string(),
                "Remove graphics/images - use text descriptions instead".to_string(),
                "Use standard fonts and avoid complex formatting".to_string(),
            ]
        );
        assert!(diagnostics.recommendations.contains(&"Include a phone number".to_string()));
        assert!(diagnostics.recommendations.contains(&"Consider adding LinkedIn or GitHub profile".to_string()));
        assert!(diagnostics.profiles.is_empty());
        assert_eq!(diagnostics.compatibility, CompatibilityLevel::from_score(checks.score()));
    }

    #[test]
    fn test_diagnostics_detect_profiles() {
        let checker = AtsChecker::new();
        let raw = "jane@mail.com | +1 555 123 4567 | LinkedIn.com/in/jane | github.com/jane | github.com/jane/cv";
        let checks = checker.evaluate(raw, &StructureHints::default());
        let diagnostics = checker.diagnose(raw, &checks);

        assert_eq!(diagnostics.profiles, vec!["linkedin", "github"]);
        assert!(diagnostics.recommendations.is_empty());
    }

    #[test]
    fn test_compatibility_levels() {
        assert_eq!(CompatibilityLevel::from_score(100.0), CompatibilityLevel::Excellent);
        assert_eq!(CompatibilityLevel::from_score(88.9), CompatibilityLevel::VeryGood);
        assert_eq!(CompatibilityLevel::from_score(55.6), CompatibilityLevel::Poor);
        assert_eq!(CompatibilityLevel::from_score(44.4), CompatibilityLevel::VeryPoor);
        assert_eq!(CompatibilityLevel::Good.to_string(), "Good");
    }
}
