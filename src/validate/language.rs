//! Stop-word heuristic for non-English documentation.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::config::LanguageConfig;

lazy_static! {
    static ref COMMENT_MARKERS: Regex = Regex::new(r"^\s*(?:/\*\*?|\*/|\*)?\s?").unwrap();
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref EXAMPLE_SECTION: Regex = Regex::new(r"(?s)@example\b[^@]*").unwrap();
}

/// Counts distinct stop words in a documentation block.
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    words: Vec<String>,
    pattern: Option<Regex>,
    threshold: usize,
}

impl LanguageDetector {
    pub fn new(config: &LanguageConfig) -> anyhow::Result<Self> {
        let words: Vec<String> = config
            .stop_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let pattern = if words.is_empty() {
            None
        } else {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{})\b", alternation))?)
        };

        Ok(Self {
            words,
            pattern,
            threshold: config.threshold,
        })
    }

    /// Distinct stop words found in `block`, in list order.
    pub fn matches(&self, block: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let text = normalize(block);
        let found: HashSet<&str> = pattern.find_iter(&text).map(|m| m.as_str()).collect();

        self.words
            .iter()
            .filter(|w| found.contains(w.as_str()))
            .cloned()
            .collect()
    }

    /// Matched words when they reach the threshold, `None` otherwise.
    pub fn detect(&self, block: &str) -> Option<Vec<String>> {
        let matched = self.matches(block);
        if matched.len() >= self.threshold {
            Some(matched)
        } else {
            None
        }
    }
}

/// Lowercase prose of a doc block with comment markers, fenced code and
/// `@example` sections removed.
pub fn normalize(block: &str) -> String {
    let joined = block
        .lines()
        .map(|line| {
            let line = line.trim_end();
            let line = line.strip_suffix("*/").unwrap_or(line);
            COMMENT_MARKERS.replace(line, "").to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let without_fences = CODE_FENCE.replace_all(&joined, " ");
    EXAMPLE_SECTION.replace_all(&without_fences, " ").into_owned()
}
