//! Keyword extraction from job descriptions
//!
//! Two strategies run over the job description: a noun-phrase chunker and a
//! within-document term-frequency ranker over unigrams and bigrams. Their
//! outputs are merged phrases-first, deduplicated case-insensitively in
//! first-seen order, and truncated to the requested limit. A strategy that
//! fails contributes nothing; the others still run.

use crate::error::Result;
use crate::processing::text_processor::{title_case, TextProcessor};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Minimum number of keywords before the token-scan supplement kicks in
const MIN_KEYWORDS: usize = 3;
/// Upper bound on keywords after supplementing a terse description
const SUPPLEMENT_CAP: usize = 10;
/// Runs of content words longer than this are lists, not phrases
const MAX_PHRASE_WORDS: usize = 4;
const MIN_PHRASE_CHARS: usize = 2;
const MAX_PHRASE_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Language,
    Framework,
    Database,
    Cloud,
    Tool,
    Methodology,
    Certification,
    SoftSkill,
    Other,
}

impl std::fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            KeywordCategory::Language => "language",
            KeywordCategory::Framework => "framework",
            KeywordCategory::Database => "database",
            KeywordCategory::Cloud => "cloud",
            KeywordCategory::Tool => "tool",
            KeywordCategory::Methodology => "methodology",
            KeywordCategory::Certification => "certification",
            KeywordCategory::SoftSkill => "soft skill",
            KeywordCategory::Other => "other",
        };
        write!(f, "{}", label)
    }
}

/// A salient job-description term. Importance is advisory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub category: KeywordCategory,
    pub importance: f32,
}

impl Keyword {
    pub fn new(term: impl Into<String>, category: KeywordCategory, importance: f32) -> Self {
        Self {
            term: term.into(),
            category,
            importance: importance.clamp(0.0, 1.0),
        }
    }
}

/// One way of pulling candidate terms out of a job description
pub trait KeywordStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Candidate terms, most relevant first
    fn extract(&self, text: &str, limit: usize) -> Result<Vec<String>>;
}

/// Maximal runs of content words inside a clause, approximating noun chunks
pub struct NounPhraseStrategy {
    processor: TextProcessor,
}

/// Unigram and bigram terms ranked by frequency over the document length
pub struct TermFrequencyStrategy {
    processor: TextProcessor,
}

pub struct KeywordExtractor {
    strategies: Vec<Box<dyn KeywordStrategy>>,
    taxonomy: SkillTaxonomy,
}

impl Default for NounPhraseStrategy {
    fn default() -> Self {
        Self {
            processor: TextProcessor::new(),
        }
    }
}

impl NounPhraseStrategy {
    fn flush(&self, run: &mut Vec<String>, phrases: &mut Vec<String>, seen: &mut HashSet<String>) {
        if run.is_empty() {
            return;
        }

        // A verb never heads a noun phrase, and a lone verb is not a keyword
        let first_noun = run.iter().position(|w| !is_action_verb(w)).unwrap_or(run.len());
        run.drain(..first_noun);
        if run.is_empty() {
            return;
        }

        let candidates: Vec<String> = if run.len() > MAX_PHRASE_WORDS {
            run.clone()
        } else {
            vec![run.join(" ")]
        };

        for phrase in candidates {
            let len = phrase.chars().count();
            if (MIN_PHRASE_CHARS..=MAX_PHRASE_CHARS).contains(&len) && seen.insert(phrase.clone()) {
                phrases.push(phrase);
            }
        }
        run.clear();
    }
}

impl KeywordStrategy for NounPhraseStrategy {
    fn name(&self) -> &'static str {
        "noun-phrase"
    }

    fn extract(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        let mut phrases = Vec::new();
        let mut seen = HashSet::new();
        let mut run: Vec<String> = Vec::new();

        for sentence in self.processor.split_sentences(text) {
            for token in self.processor.term_tokens(sentence) {
                if token.starts_clause {
                    self.flush(&mut run, &mut phrases, &mut seen);
                }

                if self.processor.is_content_token(&token.text) {
                    run.push(token.text);
                } else {
                    self.flush(&mut run, &mut phrases, &mut seen);
                }

                if token.ends_clause {
                    self.flush(&mut run, &mut phrases, &mut seen);
                }
            }
            self.flush(&mut run, &mut phrases, &mut seen);
        }

        phrases.truncate(limit);
        Ok(phrases)
    }
}

impl Default for TermFrequencyStrategy {
    fn default() -> Self {
        Self {
            processor: TextProcessor::new(),
        }
    }
}

impl TermFrequencyStrategy {
    fn is_term(&self, token: &str) -> bool {
        self.processor.is_content_token(token) && !is_action_verb(token)
    }
}

impl KeywordStrategy for TermFrequencyStrategy {
    fn name(&self) -> &'static str {
        "term-frequency"
    }

    fn extract(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        // (term, count) in first-seen order
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut total_terms = 0usize;

        let mut bump = |term: String, counts: &mut Vec<(String, usize)>| match index.get(&term) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(term.clone(), counts.len());
                counts.push((term, 1));
            }
        };

        for sentence in self.processor.split_sentences(text) {
            let tokens = self.processor.term_tokens(sentence);

            // Unigrams of a sentence are seen before its bigrams
            for token in tokens.iter().filter(|t| self.is_term(&t.text)) {
                total_terms += 1;
                bump(token.text.clone(), &mut counts);
            }

            for pair in tokens.windows(2) {
                let (token, next) = (&pair[0], &pair[1]);
                let joined = !token.ends_clause && !next.starts_clause;
                if joined && self.is_term(&token.text) && self.is_term(&next.text) {
                    bump(format!("{} {}", token.text, next.text), &mut counts);
                }
            }
        }

        if total_terms == 0 {
            return Ok(Vec::new());
        }

        let total = total_terms as f32;
        let mut scored: Vec<(String, f32)> = counts
            .into_iter()
            .map(|(term, count)| (term, count as f32 / total))
            .collect();

        // Stable sort keeps first-seen order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored.into_iter().take(limit).map(|(term, _)| term).collect())
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Noun phrases first, then frequency-ranked terms
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(NounPhraseStrategy::default()),
            Box::new(TermFrequencyStrategy::default()),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn KeywordStrategy>>) -> Self {
        Self {
            strategies,
            taxonomy: SkillTaxonomy::default(),
        }
    }

    /// Ranked, distinct terms for a normalized job description
    pub fn extract_terms(&self, text: &str, limit: usize) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for strategy in &self.strategies {
            let terms = match strategy.extract(text, limit) {
                Ok(terms) => terms,
                Err(e) => {
                    warn!("Keyword strategy '{}' failed, skipping it: {}", strategy.name(), e);
                    Vec::new()
                }
            };
            debug!("Keyword strategy '{}' produced {} terms", strategy.name(), terms.len());

            for term in terms {
                let key = term.trim().to_lowercase();
                if !key.is_empty() && seen.insert(key.clone()) {
                    merged.push(key);
                }
            }
        }
        merged.truncate(limit);

        if merged.len() < MIN_KEYWORDS {
            self.supplement(text, &mut merged, &mut seen);
            merged.truncate(limit);
        }

        merged
    }

    /// Ranked keywords with category and advisory importance
    pub fn extract(&self, text: &str, limit: usize) -> Vec<Keyword> {
        let text_lower = text.to_lowercase();
        self.extract_terms(text, limit)
            .into_iter()
            .map(|term| {
                let lower = term.to_lowercase();
                let occurrences = text_lower.matches(lower.as_str()).count();
                let importance = (occurrences as f32 * 0.2).min(1.0);
                let category = self.taxonomy.categorize(&lower);
                Keyword::new(term, category, importance)
            })
            .collect()
    }

    pub fn categorize(&self, term: &str) -> KeywordCategory {
        self.taxonomy.categorize(&term.to_lowercase())
    }

    /// Terse descriptions still yield a usable keyword set: longer words,
    /// title-cased, up to a small cap.
    fn supplement(&self, text: &str, merged: &mut Vec<String>, seen: &mut HashSet<String>) {
        for word in text.split_whitespace() {
            if merged.len() >= SUPPLEMENT_CAP {
                break;
            }
            let clean = word.trim_matches(|c| ".,!?;:()[]\"".contains(c));
            if clean.chars().count() <= 4 {
                continue;
            }
            let term = title_case(clean);
            if seen.insert(term.to_lowercase()) {
                merged.push(term);
            }
        }
    }
}

/// Built-in skill vocabulary used only to label extracted keywords
pub struct SkillTaxonomy {
    entries: Vec<(KeywordCategory, &'static [&'static str])>,
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self {
            entries: vec![
                (KeywordCategory::Language, LANGUAGES),
                (KeywordCategory::Framework, FRAMEWORKS),
                (KeywordCategory::Database, DATABASES),
                (KeywordCategory::Cloud, CLOUD),
                (KeywordCategory::Tool, TOOLS),
                (KeywordCategory::Methodology, METHODOLOGIES),
                (KeywordCategory::Certification, CERTIFICATIONS),
                (KeywordCategory::SoftSkill, SOFT_SKILLS),
            ],
        }
    }
}

impl SkillTaxonomy {
    /// Exact vocabulary hits win; otherwise the first vocabulary entry that
    /// appears as a word (or word sequence) inside the term.
    pub fn categorize(&self, term_lower: &str) -> KeywordCategory {
        for (category, skills) in &self.entries {
            if skills.contains(&term_lower) {
                return *category;
            }
        }

        let words: Vec<&str> = term_lower.split([' ', '/']).filter(|w| !w.is_empty()).collect();
        for (category, skills) in &self.entries {
            for skill in skills.iter() {
                let skill_words: Vec<&str> = skill.split(' ').collect();
                if words.windows(skill_words.len()).any(|w| w == skill_words.as_slice()) {
                    return *category;
                }
            }
        }

        KeywordCategory::Other
    }
}

fn is_action_verb(word: &str) -> bool {
    ACTION_VERBS.contains(&word)
}

/// Imperative verbs job postings use to open a duty
const ACTION_VERBS: &[&str] = &[
    "analyze", "automate", "build", "building", "collaborate", "communicate", "contribute",
    "coordinate", "create", "debug", "define", "deliver", "deploy", "design", "develop",
    "drive", "ensure", "establish", "evaluate", "execute", "grow", "help", "identify",
    "implement", "improve", "lead", "leverage", "maintain", "manage", "mentor", "operate",
    "optimize", "own", "participate", "partner", "provide", "review", "scale", "ship",
    "support", "translate", "troubleshoot", "understand", "use", "write",
];

const LANGUAGES: &[&str] = &[
    "python", "java", "javascript", "typescript", "go", "golang", "rust", "c++", "c#", "c",
    "php", "ruby", "swift", "kotlin", "scala", "sql", "r", "matlab", "perl", "bash", "shell",
    "html", "css",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "spring boot", "express",
    "laravel", "rails", "node.js", "next.js", "tensorflow", "pytorch", "keras",
    "scikit-learn", "pandas", "numpy", "bootstrap", "tailwind", "redux", ".net",
];

const DATABASES: &[&str] = &[
    "postgresql", "postgres", "mysql", "mongodb", "redis", "elasticsearch", "cassandra",
    "dynamodb", "sqlite", "oracle", "neo4j",
];

const CLOUD: &[&str] = &[
    "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "terraform", "heroku",
    "serverless", "lambda",
];

const TOOLS: &[&str] = &[
    "git", "github", "gitlab", "jenkins", "ansible", "jira", "confluence", "kafka",
    "rabbitmq", "nginx", "linux", "graphql", "grpc", "selenium", "jest", "airflow", "spark",
];

const METHODOLOGIES: &[&str] = &[
    "agile", "scrum", "kanban", "devops", "ci/cd", "tdd", "bdd", "microservices", "rest",
    "unit testing", "integration testing", "machine learning", "data analysis",
];

const CERTIFICATIONS: &[&str] = &[
    "pmp", "cissp", "cism", "cisa", "cpa", "cfa", "aws certified", "scrum master",
    "certified", "certification",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership", "communication", "teamwork", "collaboration", "mentoring",
    "problem solving", "critical thinking", "adaptability", "time management",
    "stakeholder management", "ownership",
];
