//! Score aggregation, summary text and rule-based suggestions

use crate::processing::alignment::SectionAlignment;

pub const KEYWORD_WEIGHT: f64 = 0.5;
pub const ATS_WEIGHT: f64 = 0.3;
pub const SECTION_WEIGHT: f64 = 0.2;

pub const MAX_SUGGESTIONS: usize = 5;

const GENERAL_TIPS: [&str; 3] = [
    "Include quantifiable achievements with numbers and percentages",
    "Use action verbs to describe your accomplishments",
    "Optimize formatting for better ATS scanning",
];

/// Round half away from zero to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean section similarity, one decimal; 0 with no sections
pub fn average_similarity(alignments: &[SectionAlignment]) -> f64 {
    if alignments.is_empty() {
        return 0.0;
    }
    let total: f64 = alignments.iter().map(|a| a.similarity).sum();
    round_to_tenth(total / alignments.len() as f64)
}

pub fn overall_score(keyword_score: f64, ats_score: f64, avg_section: f64) -> f64 {
    round_to_tenth(
        KEYWORD_WEIGHT * keyword_score + ATS_WEIGHT * ats_score + SECTION_WEIGHT * avg_section,
    )
}

pub fn summary(
    keyword_score: f64,
    ats_score: f64,
    avg_section: f64,
    overall: f64,
    missing_count: usize,
) -> String {
    format!(
        "Keyword coverage: {:.1}%. ATS checks: {:.1}%. Section alignment avg: {:.1}%. Overall: {:.1}%. Missing {} key terms.",
        keyword_score, ats_score, avg_section, overall, missing_count
    )
}

/// Deterministic advice. Rules apply in order and the list is capped.
pub fn suggestions(missing: &[String], matched_count: usize, total_keywords: usize) -> Vec<String> {
    let mut out = Vec::new();

    match missing.len() {
        0 => {}
        1..=3 => out.push(format!(
            "Consider adding these key skills: {}",
            missing.join(", ")
        )),
        n => out.push(format!(
            "Add missing keywords: {} and {} others",
            missing[..3].join(", "),
            n - 3
        )),
    }

    let match_percentage = if total_keywords > 0 {
        matched_count as f64 / total_keywords as f64 * 100.0
    } else {
        0.0
    };

    if match_percentage < 50.0 {
        out.push(
            "Focus on highlighting relevant technical skills mentioned in the job description"
                .to_string(),
        );
    } else if match_percentage < 75.0 {
        out.push(
            "Include more specific examples of your experience with the required technologies"
                .to_string(),
        );
    }

    out.extend(GENERAL_TIPS.iter().map(|tip| tip.to_string()));
    out.truncate(MAX_SUGGESTIONS);
    out
}
