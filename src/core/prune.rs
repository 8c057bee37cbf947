//! Greedy substring pruning of keyword candidates.
//!
//! Candidates arrive sorted by ascending word count and are consumed as
//! a stack: the tail (a longest remaining phrase) is kept, and every
//! remaining candidate contained in it is dropped. Repeats until empty.
//!
//! Candidates are whole words joined by single spaces, so plain substring
//! containment only fires on word-aligned sub-phrases in practice. The
//! result depends on input order among equal-length candidates.

use std::hash::Hash;

use indexmap::IndexSet;

/// Reduce `candidates` to an antichain under substring containment.
///
/// Returned in selection order (the order phrases were kept).
pub fn prune<S>(mut candidates: Vec<S>) -> IndexSet<S>
where
    S: AsRef<str> + Eq + Hash,
{
    let mut kept = IndexSet::new();

    while let Some(candidate) = candidates.pop() {
        let phrase = candidate.as_ref();
        candidates.retain(|c| !phrase.contains(c.as_ref()));
        kept.insert(candidate);
    }

    kept
}
