//! Per-ngram impression totals and winning-row attribution.
//!
//! Two passes over the exploded rows, joined on the ngram text:
//! - sums: total impressions of every row producing the ngram
//! - winners: the row with the most impressions; among equals the one
//!   latest in input order (stable ascending sort, keep last)
//!
//! Both are keyed by `BTreeMap`, so aggregates come out in ascending
//! ngram order regardless of hashing.

use std::collections::BTreeMap;

use crate::core::expand::ExplodedRecord;
use crate::core::record::QueryRecord;

/// One distinct ngram with its total and its winning report row
#[derive(Debug, Clone, PartialEq)]
pub struct NgramAggregate<'a> {
    pub ngram: String,
    pub total_impressions: u64,
    pub winner: &'a QueryRecord,
}

/// Total impressions per ngram
pub fn sum_impressions<'e>(exploded: &'e [ExplodedRecord<'_>]) -> BTreeMap<&'e str, u64> {
    let mut sums = BTreeMap::new();
    for row in exploded {
        let total: &mut u64 = sums.entry(row.ngram.as_str()).or_default();
        *total = total.saturating_add(row.impressions());
    }
    sums
}

/// Winning report row per ngram
pub fn select_winners<'e, 'a>(exploded: &'e [ExplodedRecord<'a>]) -> BTreeMap<&'e str, &'a QueryRecord> {
    let mut by_impressions: Vec<&ExplodedRecord<'a>> = exploded.iter().collect();

    // Stable: equal counts keep input order, so the later row lands last
    by_impressions.sort_by_key(|row| row.impressions());

    let mut winners = BTreeMap::new();
    for row in by_impressions {
        winners.insert(row.ngram.as_str(), row.query.record);
    }
    winners
}

/// Join sums and winners into one aggregate per distinct ngram
pub fn aggregate<'a>(exploded: &[ExplodedRecord<'a>]) -> Vec<NgramAggregate<'a>> {
    let sums = sum_impressions(exploded);
    let mut winners = select_winners(exploded);

    sums.into_iter()
        .filter_map(|(ngram, total_impressions)| {
            winners.remove(ngram).map(|winner| NgramAggregate {
                ngram: ngram.to_string(),
                total_impressions,
                winner,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expand::{NormalizedQuery, expand};

    fn records() -> Vec<QueryRecord> {
        vec![
            QueryRecord::new("the new blue bike", 300, "blue bikes", "campaign name"),
            QueryRecord::new("new bike", 200, "yellow bikes", "campaign name"),
            QueryRecord::new("new bike", 100, "blue bikes", "campaign name"),
            QueryRecord::new("red bike", 10, "red bike", "campaign name"),
            QueryRecord::new("bike", 300, "blue bike", "campaign name"),
        ]
    }

    fn normalized(records: &[QueryRecord]) -> Vec<NormalizedQuery<'_>> {
        records
            .iter()
            .map(|r| NormalizedQuery {
                record: r,
                normalized: r.search_term.trim_start_matches("the ").to_string(),
            })
            .collect()
    }

    fn find<'x, 'a>(aggs: &'x [NgramAggregate<'a>], ngram: &str) -> &'x NgramAggregate<'a> {
        aggs.iter().find(|a| a.ngram == ngram).expect("ngram present")
    }

    #[test]
    fn test_sums_cover_every_producing_row() {
        let records = records();
        let queries = normalized(&records);
        let exploded = expand(&queries);
        let sums = sum_impressions(&exploded);

        assert_eq!(sums["bike"], 910);
        assert_eq!(sums["new bike"], 300);
        assert_eq!(sums["new blue bike"], 300);
        assert_eq!(sums["red"], 10);
    }

    #[test]
    fn test_winner_is_max_impressions_with_later_row_on_ties() {
        let records = records();
        let queries = normalized(&records);
        let aggs = aggregate(&expand(&queries));

        // 300 from row 0 ties 300 from row 4: the later row wins
        assert_eq!(find(&aggs, "bike").winner.ad_group_name, "blue bike");
        assert_eq!(find(&aggs, "new bike").winner.ad_group_name, "yellow bikes");
        assert_eq!(find(&aggs, "new").winner.search_term, "the new blue bike");
        assert_eq!(find(&aggs, "red bike").total_impressions, 10);
    }

    #[test]
    fn test_aggregates_are_sorted_by_ngram() {
        let records = records();
        let queries = normalized(&records);
        let aggs = aggregate(&expand(&queries));

        let names: Vec<&str> = aggs.iter().map(|a| a.ngram.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(aggs.len(), 9);
    }

    #[test]
    fn test_winner_tie_break_matches_fold() {
        // Replacing the kept winner on `>=` in input order is the same rule
        let records = vec![
            QueryRecord::new("x", 5, "first", "c"),
            QueryRecord::new("x", 7, "second", "c"),
            QueryRecord::new("x", 7, "third", "c"),
            QueryRecord::new("x", 6, "fourth", "c"),
        ];
        let queries = normalized(&records);
        let exploded = expand(&queries);

        let folded = exploded
            .iter()
            .fold(None::<&QueryRecord>, |kept, row| match kept {
                Some(k) if k.impressions > row.impressions() => Some(k),
                _ => Some(row.query.record),
            })
            .unwrap();

        let winners = select_winners(&exploded);
        assert_eq!(winners["x"].ad_group_name, "third");
        assert_eq!(folded.ad_group_name, "third");
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }
}
