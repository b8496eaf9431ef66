//! Text normalization and tokenization

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Characters that stay inside a term because tech names depend on them
/// ("c++", "c#", "ci/cd", "node.js", "front-end").
const TERM_PUNCTUATION: &[char] = &['+', '#', '/', '.', '-'];

/// Collapse every whitespace run to a single space and trim both ends.
/// Case is preserved.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case a word the way recruiters expect to read it back: the first
/// letter of every alphabetic run is upper-cased, the rest lower-cased.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_is_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

/// One word of a sentence, cleaned for term extraction
#[derive(Debug, Clone, PartialEq)]
pub struct TermToken {
    /// Lower-cased, stripped of punctuation that is not part of tech names
    pub text: String,
    /// The word was followed by clause punctuation (`,` `;` `:` `)` ...)
    pub ends_clause: bool,
    /// The word was preceded by an opening bracket or quote
    pub starts_clause: bool,
}

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Split text into sentences using Unicode sentence boundaries
    pub fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Tokenize one sentence into cleaned term tokens, keeping clause
    /// boundaries so phrases never span a comma or a bracket.
    pub fn term_tokens(&self, sentence: &str) -> Vec<TermToken> {
        let mut tokens: Vec<TermToken> = Vec::new();

        for raw in sentence.split_whitespace() {
            let starts_clause = raw.starts_with(['(', '[', '"', '\'', '{']);
            let ends_clause =
                raw.ends_with([',', ';', ':', '.', '!', '?', ')', ']', '"', '\'', '}']);

            let cleaned: String = raw
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric() || TERM_PUNCTUATION.contains(c))
                .collect();
            let cleaned = cleaned.trim_matches(|c| matches!(c, '.' | '-' | '/')).to_string();

            if cleaned.is_empty() {
                // A bare dash or slash still separates phrases
                if let Some(last) = tokens.last_mut() {
                    last.ends_clause = true;
                }
                continue;
            }

            tokens.push(TermToken {
                text: cleaned,
                ends_clause,
                starts_clause,
            });
        }

        tokens
    }

    /// A token worth keeping as (part of) a keyword
    pub fn is_content_token(&self, token: &str) -> bool {
        token.chars().count() >= 2
            && token.chars().any(|c| c.is_alphabetic())
            && !self.is_stop_word(token)
    }

    /// Lower-cased whitespace tokens trimmed of surrounding punctuation
    pub fn plain_tokens(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "also", "am", "an",
    "and", "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "e.g", "etc", "even", "every", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "i.e",
    "if", "in", "into", "is", "it", "its", "itself", "just", "least", "less", "like", "many",
    "may", "me", "might", "more", "most", "much", "must", "my", "no", "nor", "not", "of",
    "off", "on", "once", "one", "only", "or", "other", "our", "ours", "out", "over", "own",
    "per", "same", "shall", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "within", "without", "would", "you", "your", "yours",
    // Job-posting filler that never names a skill
    "ability", "able", "candidate", "candidates", "company", "ideal", "ideally", "including",
    "join", "looking", "new", "nice", "plus", "position", "preferred", "required",
    "requirements", "responsibilities", "qualifications", "role", "seeking", "strong",
    "team", "using", "work", "working", "year", "years",
];
