//! One-to-many fan-out of normalized queries into per-ngram rows.

use crate::core::ngram::ngrams;
use crate::core::record::QueryRecord;

/// A report row together with its normalized search term
#[derive(Debug, Clone)]
pub struct NormalizedQuery<'a> {
    pub record: &'a QueryRecord,
    pub normalized: String,
}

/// A normalized query paired with exactly one of its ngrams
#[derive(Debug, Clone)]
pub struct ExplodedRecord<'a> {
    pub ngram: String,
    pub query: &'a NormalizedQuery<'a>,
}

impl ExplodedRecord<'_> {
    pub fn impressions(&self) -> u64 {
        self.query.record.impressions
    }
}

/// Duplicate each row once per value produced for it, attaching one
/// value to each copy. Output follows row order, then value order.
pub fn explode<'r, R, V, I, F>(rows: &'r [R], mut values: F) -> Vec<(&'r R, V)>
where
    F: FnMut(&'r R) -> I,
    I: IntoIterator<Item = V>,
{
    rows.iter()
        .flat_map(|row| values(row).into_iter().map(move |v| (row, v)))
        .collect()
}

/// One exploded row per (query, ngram of its normalized term)
pub fn expand<'a>(queries: &'a [NormalizedQuery<'a>]) -> Vec<ExplodedRecord<'a>> {
    explode(queries, |q| ngrams(&q.normalized))
        .into_iter()
        .map(|(query, ngram)| ExplodedRecord { ngram, query })
        .collect()
}
