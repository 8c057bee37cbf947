//! Word n-gram enumeration.

use indexmap::IndexSet;

/// Number of whitespace-separated words in a phrase
pub fn word_count(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}

/// Every contiguous word window of `phrase`, joined by single spaces.
///
/// Ordered by window length, then start position. Windows that repeat
/// (e.g. a word occurring twice) collapse to their first occurrence, so
/// a `k`-word phrase yields at most `k(k+1)/2` entries.
pub fn ngrams(phrase: &str) -> IndexSet<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let mut out = IndexSet::with_capacity(words.len() * (words.len() + 1) / 2);

    for len in 1..=words.len() {
        for window in words.windows(len) {
            out.insert(window.join(" "));
        }
    }

    out
}
