//! Unprocessed-set filter
//!
//! Decides which fetched commits a cycle still has to summarize.

use crate::types::CommitRecord;
use std::collections::HashSet;

/// Return the candidates whose hash is not yet recorded, preserving order
///
/// An empty recorded set (first-ever run) returns all candidates. Pure, no
/// mutation; idempotent for fixed inputs.
pub fn filter_unprocessed(
    recorded: &HashSet<String>,
    candidates: Vec<CommitRecord>,
) -> Vec<CommitRecord> {
    candidates
        .into_iter()
        .filter(|commit| !recorded.contains(&commit.commit_hash))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str) -> CommitRecord {
        CommitRecord {
            commit_hash: hash.to_string(),
            commit_message: String::new(),
            commit_author_name: String::new(),
            commit_author_avatar: String::new(),
            commit_date: String::new(),
        }
    }

    fn hashes(records: &[CommitRecord]) -> Vec<&str> {
        records.iter().map(|r| r.commit_hash.as_str()).collect()
    }

    #[test]
    fn test_empty_recorded_returns_all() {
        let candidates = vec![record("a"), record("b"), record("c")];
        let filtered = filter_unprocessed(&HashSet::new(), candidates);
        assert_eq!(hashes(&filtered), ["a", "b", "c"]);
    }

    #[test]
    fn test_recorded_subset_removed_order_kept() {
        let recorded: HashSet<String> = ["b".to_string()].into();
        let candidates = vec![record("a"), record("b"), record("c")];
        let filtered = filter_unprocessed(&recorded, candidates);
        assert_eq!(hashes(&filtered), ["a", "c"]);
    }

    #[test]
    fn test_idempotent() {
        let recorded: HashSet<String> = ["x".to_string()].into();
        let candidates = vec![record("x"), record("y")];

        let once = filter_unprocessed(&recorded, candidates.clone());
        let twice = filter_unprocessed(&recorded, once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_everything_recorded_returns_empty() {
        let recorded: HashSet<String> = ["a".to_string(), "b".to_string()].into();
        let candidates = vec![record("a"), record("b")];
        assert!(filter_unprocessed(&recorded, candidates).is_empty());
    }
}
