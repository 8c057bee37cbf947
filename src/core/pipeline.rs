//! Filepath: src/core/pipeline.rs
//! End-to-end keyword selection over one in-memory report.
//!
//! records → normalize (ASINs excluded) → ngrams → explode → aggregate
//! → filter → prune → project onto `SelectionTable`.

use tracing::{debug, instrument};

use crate::core::aggregate::aggregate;
use crate::core::error::SelectError;
use crate::core::expand::{NormalizedQuery, expand};
use crate::core::filter::{DEFAULT_MAX_WORDS, filter_candidates};
use crate::core::normalize::{Normalizer, is_asin};
use crate::core::prune::prune;
use crate::core::record::{QueryTable, Selection, SelectionTable};

/// Configured keyword selector
#[derive(Debug, Clone)]
pub struct Selector {
    normalizer: Normalizer,

    /// Minimum aggregate impressions for a candidate
    threshold: u64,

    /// Maximum candidate length in words
    max_words: usize,
}

impl Selector {
    /// Create a selector with the default maximum ngram length.
    ///
    /// # Errors
    /// Returns an error if the stopword matcher cannot be built.
    pub fn new<S: AsRef<str>>(threshold: u64, stopwords: &[S]) -> Result<Self, SelectError> {
        Ok(Self {
            normalizer: Normalizer::new(stopwords)?,
            threshold,
            max_words: DEFAULT_MAX_WORDS,
        })
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Select the non-redundant keyword candidates of a report.
    #[instrument(skip_all, fields(rows = table.len(), threshold = self.threshold, max_words = self.max_words))]
    pub fn select(&self, table: &QueryTable) -> SelectionTable {
        let queries: Vec<NormalizedQuery<'_>> = table
            .records()
            .iter()
            .filter(|r| !is_asin(&r.search_term))
            .map(|record| NormalizedQuery {
                record,
                normalized: self.normalizer.normalize(&record.search_term),
            })
            .collect();
        debug!(queries = queries.len(), "excluded ASIN search terms");

        if queries.is_empty() {
            return SelectionTable::empty(table.passthrough_columns());
        }

        let exploded = expand(&queries);
        debug!(rows = exploded.len(), "exploded queries into ngrams");

        let aggregates = aggregate(&exploded);
        debug!(ngrams = aggregates.len(), "aggregated ngrams");

        let candidates = filter_candidates(aggregates, self.threshold, self.max_words);
        debug!(candidates = candidates.len(), "filtered candidates");

        let kept = prune(
            candidates
                .iter()
                .map(|c| c.ngram.as_str())
                .collect(),
        );
        debug!(selections = kept.len(), "pruned candidates");

        let rows = candidates
            .iter()
            .filter(|c| kept.contains(c.ngram.as_str()))
            .map(Selection::from_aggregate)
            .collect();

        SelectionTable::new(table.passthrough_columns(), rows)
    }
}
