//! Threshold and length filtering of ngram aggregates.

use crate::core::aggregate::NgramAggregate;
use crate::core::ngram::word_count;

/// Longest ngram, in words, kept as a candidate by default
pub const DEFAULT_MAX_WORDS: usize = 10;

/// Keep aggregates with at least `threshold` impressions and at most
/// `max_words` words, ordered by ascending word count.
///
/// The sort is stable: equal-length aggregates keep their incoming order,
/// which decides how the pruner breaks ties.
pub fn filter_candidates<'a>(
    aggregates: Vec<NgramAggregate<'a>>,
    threshold: u64,
    max_words: usize,
) -> Vec<NgramAggregate<'a>> {
    let mut kept: Vec<NgramAggregate<'a>> = aggregates
        .into_iter()
        .filter(|a| a.total_impressions >= threshold && word_count(&a.ngram) <= max_words)
        .collect();

    kept.sort_by_key(|a| word_count(&a.ngram));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::QueryRecord;

    fn agg<'a>(ngram: &str, total: u64, winner: &'a QueryRecord) -> NgramAggregate<'a> {
        NgramAggregate { ngram: ngram.to_string(), total_impressions: total, winner }
    }

    #[test]
    fn test_filter_threshold_is_inclusive() {
        let r = QueryRecord::new("q", 1, "g", "c");
        let kept = filter_candidates(vec![agg("a", 298, &r), agg("b", 299, &r), agg("c", 300, &r)], 299, 10);

        let names: Vec<&str> = kept.iter().map(|a| a.ngram.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_filter_drops_long_ngrams() {
        let r = QueryRecord::new("q", 1, "g", "c");
        let kept = filter_candidates(vec![agg("1 2", 300, &r), agg("1 2 3", 300, &r), agg("2 3", 300, &r)], 0, 2);

        let names: Vec<&str> = kept.iter().map(|a| a.ngram.as_str()).collect();
        assert_eq!(names, vec!["1 2", "2 3"]);
    }

    #[test]
    fn test_filter_sorts_stably_by_word_count() {
        let r = QueryRecord::new("q", 1, "g", "c");
        let input = vec![
            agg("blue bike", 1, &r),
            agg("red gazelle bike", 1, &r),
            agg("bike", 1, &r),
            agg("a bike", 1, &r),
            agg("car", 1, &r),
        ];

        let kept = filter_candidates(input, 0, DEFAULT_MAX_WORDS);
        let names: Vec<&str> = kept.iter().map(|a| a.ngram.as_str()).collect();
        assert_eq!(names, vec!["bike", "car", "blue bike", "a bike", "red gazelle bike"]);
    }
}
