//! Keyword coverage of a resume, exact first and fuzzy as a fallback

use crate::config::EngineConfig;
use crate::error::{Result, ResumeMatchError};
use crate::processing::keywords::Keyword;
use crate::processing::scoring::round_to_tenth;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub keyword: Keyword,
    pub in_resume: bool,
    pub frequency: usize,
    pub context_snippets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub coverage: Vec<CoverageEntry>,
    /// Unmatched terms in keyword order
    pub missing: Vec<String>,
    pub keyword_score: f64,
}

impl CoverageReport {
    pub fn matched_count(&self) -> usize {
        self.coverage.iter().filter(|entry| entry.in_resume).count()
    }
}

pub struct CoverageMatcher {
    fuzzy_threshold: f64,
    snippet_window: usize,
    max_snippets: usize,
}

enum MatchKind {
    Exact(usize),
    Fuzzy,
    Missing,
}

impl Default for CoverageMatcher {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CoverageMatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fuzzy_threshold: config.fuzzy_threshold,
            snippet_window: config.snippet_window,
            max_snippets: config.max_snippets,
        }
    }

    /// Match every keyword against the resume, preserving keyword order
    pub fn compute(&self, resume: &str, keywords: &[Keyword]) -> CoverageReport {
        let resume_lower = resume.to_lowercase();
        let mut coverage = Vec::with_capacity(keywords.len());
        let mut missing = Vec::new();

        for keyword in keywords {
            let term = keyword.term.trim().to_lowercase();

            let (kind, context_snippets) = match self.match_keyword(resume, &resume_lower, &term) {
                Ok(found) => found,
                Err(e) => {
                    warn!("Could not match keyword '{}': {}", keyword.term, e);
                    (MatchKind::Missing, Vec::new())
                }
            };

            let (in_resume, frequency) = match kind {
                MatchKind::Exact(count) => (true, count),
                MatchKind::Fuzzy => (true, 1),
                MatchKind::Missing => (false, 0),
            };
            if !in_resume {
                missing.push(keyword.term.clone());
            }

            coverage.push(CoverageEntry {
                keyword: keyword.clone(),
                in_resume,
                frequency,
                context_snippets,
            });
        }

        let matched = coverage.len() - missing.len();
        let keyword_score = round_to_tenth(matched as f64 / keywords.len().max(1) as f64 * 100.0);
        debug!("Keyword coverage: {}/{} matched", matched, keywords.len());

        CoverageReport {
            coverage,
            missing,
            keyword_score,
        }
    }

    /// Exact hits and their snippets come from the same matcher; a fuzzy
    /// hit has no exact span to quote.
    fn match_keyword(
        &self,
        resume: &str,
        resume_lower: &str,
        term: &str,
    ) -> Result<(MatchKind, Vec<String>)> {
        if term.is_empty() || resume.trim().is_empty() {
            return Ok((MatchKind::Missing, Vec::new()));
        }

        let matcher = term_matcher(term)?;
        let count = matcher.find_iter(resume).count();
        if count > 0 {
            return Ok((MatchKind::Exact(count), self.snippets_for(&matcher, resume)));
        }

        let ratio = partial_ratio(term, resume_lower);
        if ratio >= self.fuzzy_threshold {
            debug!("Fuzzy match for '{}' at ratio {:.1}", term, ratio);
            return Ok((MatchKind::Fuzzy, Vec::new()));
        }

        Ok((MatchKind::Missing, Vec::new()))
    }

    /// Windows of context around each case-insensitive occurrence
    pub fn find_snippets(&self, text: &str, term: &str) -> Result<Vec<String>> {
        if term.is_empty() || self.max_snippets == 0 {
            return Ok(Vec::new());
        }
        let matcher = term_matcher(term)?;
        Ok(self.snippets_for(&matcher, text))
    }

    fn snippets_for(&self, matcher: &Regex, text: &str) -> Vec<String> {
        matcher
            .find_iter(text)
            .take(self.max_snippets)
            .map(|m| {
                let start = step_back(text, m.start(), self.snippet_window);
                let end = step_forward(text, m.end(), self.snippet_window);
                text[start..end].trim().to_string()
            })
            .collect()
    }
}

/// Literal, Unicode case-insensitive matcher for one term
fn term_matcher(term: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            ResumeMatchError::Extraction(format!("Failed to build matcher for '{}': {}", term, e))
        })
}

/// Byte offset `chars` characters before `from`, clipped to the start
fn step_back(text: &str, from: usize, chars: usize) -> usize {
    if chars == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset `chars` characters after `from`, clipped to the end
fn step_forward(text: &str, from: usize, chars: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Best similarity (0-100) between `needle` and any same-sized window of
/// `haystack` that starts at a word. Window sizes within one character of
/// the needle absorb a dropped or doubled letter.
pub fn partial_ratio(needle: &str, haystack: &str) -> f64 {
    let needle_len = needle.chars().count();
    let chars: Vec<char> = haystack.chars().collect();

    if needle_len == 0 || chars.is_empty() {
        return 0.0;
    }
    if needle_len >= chars.len() {
        return normalized_levenshtein(needle, haystack) * 100.0;
    }

    let mut best = 0.0f64;
    for start in 0..chars.len() {
        if start > 0 && !chars[start - 1].is_whitespace() {
            continue;
        }
        for len in [needle_len.saturating_sub(1).max(1), needle_len, needle_len + 1] {
            let end = (start + len).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            best = best.max(normalized_levenshtein(needle, &window));
        }
        if best >= 1.0 {
            break;
        }
    }

    best * 100.0
}
