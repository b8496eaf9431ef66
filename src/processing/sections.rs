//! Resume section segmentation by header detection

use crate::processing::text_processor::title_case;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bucket for content that precedes the first recognized header
pub const OTHER_SECTION: &str = "other";

const MAX_HEADER_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub content: String,
}

pub struct SectionSegmenter {
    patterns: Vec<(&'static str, Regex)>,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionSegmenter {
    pub fn new() -> Self {
        let patterns = [
            ("contact", r"contact(?: info(?:rmation)?| details)?|personal info(?:rmation)?"),
            ("summary", r"(?:professional )?(?:summary|profile|objective|about(?: me)?)"),
            ("skills", r"(?:technical |core |key )?(?:skills|technologies|tooling|competencies|expertise)"),
            ("experience", r"(?:professional |work |relevant )?(?:experience|employment(?: history)?|work history|career history)"),
            ("projects", r"(?:personal |notable |selected )?(?:projects?|portfolio)"),
            ("education", r"education|academic background|qualifications"),
            ("certifications", r"certifications?|licenses?|credentials|certifications (?:and|&) licenses"),
            ("awards", r"awards?|honou?rs|achievements"),
            ("languages", r"languages"),
            ("volunteer", r"volunteer(?:ing| experience| work)?"),
            ("publications", r"publications"),
            ("interests", r"interests|hobbies"),
        ]
        .into_iter()
        .map(|(name, pattern)| {
            let anchored = format!(r"^(?:{})\s*:?$", pattern);
            (name, Regex::new(&anchored).expect("Invalid section header regex"))
        })
        .collect();

        Self { patterns }
    }

    /// Split raw resume text into named sections in first-seen order.
    /// Repeated headers append to the earlier section; sections left empty
    /// after trimming are dropped.
    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut buckets: Vec<(&'static str, Vec<&str>)> = vec![(OTHER_SECTION, Vec::new())];
        let mut current = 0usize;

        for line in text.lines() {
            let trimmed = line.trim();

            let (name, rest) = match self.match_header(trimmed) {
                Some(name) => (name, None),
                None => match self.match_inline_header(trimmed) {
                    Some((name, rest)) => (name, Some(rest)),
                    None => {
                        buckets[current].1.push(trimmed);
                        continue;
                    }
                },
            };

            current = match buckets.iter().position(|(n, _)| *n == name) {
                Some(idx) => idx,
                None => {
                    buckets.push((name, Vec::new()));
                    buckets.len() - 1
                }
            };
            if let Some(rest) = rest {
                buckets[current].1.push(rest);
            }
        }

        let sections: Vec<Section> = buckets
            .into_iter()
            .filter_map(|(name, lines)| {
                let content = lines.join("\n").trim().to_string();
                (!content.is_empty()).then(|| Section {
                    name: name.to_string(),
                    content,
                })
            })
            .collect();

        debug!(
            "Detected sections: {:?}",
            sections.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
        );
        sections
    }

    /// Section name for a header line, if the line is one
    pub fn match_header(&self, line: &str) -> Option<&'static str> {
        if !is_header_candidate(line) {
            return None;
        }

        let lower = line.to_lowercase();
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(name, _)| *name)
    }

    /// Header and remaining content for a `Header: content` line
    pub fn match_inline_header<'a>(&self, line: &'a str) -> Option<(&'static str, &'a str)> {
        let (prefix, rest) = line.split_once(':')?;
        let (prefix, rest) = (prefix.trim(), rest.trim());
        if prefix.is_empty() || rest.is_empty() {
            return None;
        }

        let lower = prefix.to_lowercase();
        let name = self
            .patterns
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(name, _)| *name)?;
        Some((name, rest))
    }
}

/// Short lines that are upper-case, title-case or end with a colon
fn is_header_candidate(line: &str) -> bool {
    if line.is_empty() || line.chars().count() >= MAX_HEADER_CHARS {
        return false;
    }

    let has_cased = line.chars().any(|c| c.is_alphabetic());
    let upper = has_cased && !line.chars().any(|c| c.is_lowercase());
    let title = has_cased && title_case(line) == line;

    upper || title || line.ends_with(':')
}
