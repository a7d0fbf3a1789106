//! Keyword-based concept extraction
//!
//! Purely local string processing: split on non-alphanumeric boundaries,
//! lowercase, drop stop words and short tokens, and optionally collapse a
//! trailing plural "s". The plural rule is naive: "analysis" becomes
//! "analysi". Stored graphs are keyed on these exact tokens.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could",
    "should", "may", "might", "must", "shall", "can", "need", "to", "of",
    "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "over",
    "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "just", "and", "but", "if", "or", "because", "until", "while",
    "about", "against", "this", "that", "these", "those", "what", "which",
    "who", "whom", "i", "me", "my", "we", "our", "you", "your", "he", "him",
    "his", "she", "her", "it", "its", "they", "them", "their", "up", "down",
    "out", "off", "also", "any", "both", "many", "much", "one",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorConfig {
    /// Tokens shorter than this (in characters) are dropped
    pub min_length: usize,
    /// Strip a trailing "s" (but not "ss")
    pub collapse_plurals: bool,
    /// Additional stop words on top of the built-in list
    pub extra_stopwords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            collapse_plurals: true,
            extra_stopwords: Vec::new(),
        }
    }
}

pub struct ConceptExtractor {
    min_length: usize,
    collapse_plurals: bool,
    stop_words: HashSet<String>,
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl ConceptExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        let stop_words = STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_stopwords.iter().map(|w| w.trim().to_lowercase()))
            .collect();

        Self {
            min_length: config.min_length,
            collapse_plurals: config.collapse_plurals,
            stop_words,
        }
    }

    /// Extract the set of concepts mentioned in `text`
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let concepts: BTreeSet<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.normalize(token))
            .collect();

        log::debug!("Extracted {} concepts from {} bytes", concepts.len(), text.len());
        concepts
    }

    /// Normalize a single raw token, or `None` if it is filtered out
    pub fn normalize(&self, token: &str) -> Option<String> {
        let mut token = token.to_lowercase();
        if self.stop_words.contains(&token) {
            return None;
        }

        if self.collapse_plurals && token.ends_with('s') && !token.ends_with("ss") {
            token.pop();
        }

        if token.chars().count() < self.min_length || self.stop_words.contains(&token) {
            return None;
        }
        Some(token)
    }
}
