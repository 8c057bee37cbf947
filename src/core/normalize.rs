//! Search-term normalization and ASIN exclusion.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::{Regex, RegexBuilder};

use crate::core::error::SelectError;

/// Anything that is neither a word character nor a plain space
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w ]").expect("valid regex"));

/// Product identifiers look like `b0` followed by eight more characters
pub fn is_asin(query: &str) -> bool {
    query.starts_with("b0") && query.chars().count() == 10
}

/// Lowercases queries and strips stopwords and punctuation.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Whole-word alternation of all stopwords; `None` when the list is empty
    stopwords: Option<Regex>,
}

impl Normalizer {
    /// Build a normalizer from literal stopwords (blank entries are ignored).
    ///
    /// # Errors
    /// Returns an error if the combined pattern exceeds the regex size limit.
    pub fn new<S: AsRef<str>>(stopwords: &[S]) -> Result<Self, SelectError> {
        let words: Vec<String> = stopwords
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();

        if words.is_empty() {
            return Ok(Self { stopwords: None });
        }

        let pattern = format!(r"\b(?:{})\b", words.join("|"));
        let matcher = RegexBuilder::new(&pattern).case_insensitive(true).build()?;

        Ok(Self { stopwords: Some(matcher) })
    }

    /// Lowercase, drop stopwords, drop punctuation, collapse whitespace.
    pub fn normalize(&self, query: &str) -> String {
        let lower = query.to_lowercase();

        let no_stopwords = match &self.stopwords {
            Some(re) => re.replace_all(&lower, ""),
            None => lower.as_str().into(),
        };

        NON_WORD.replace_all(&no_stopwords, "").split_whitespace().join(" ")
    }
}
