//! Commit-listing response normalization
//!
//! The host returns loosely-shaped JSON; entries may lack the nested author
//! or avatar objects entirely. Normalization substitutes empty strings,
//! orders by author date descending, and truncates to the history limit.

use crate::types::CommitRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One raw entry of the host's commit-listing response
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitEntry {
    pub sha: String,
    pub commit: RawCommitDetail,
    /// The host-side account, absent when the author has no account
    #[serde(default)]
    pub author: Option<RawAccount>,
}

/// Nested commit detail of a raw entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<RawSignature>,
}

/// Author signature, any field of which may be missing
#[derive(Debug, Clone, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Host account fields the pipeline cares about
#[derive(Debug, Clone, Deserialize)]
pub struct RawAccount {
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RawCommitEntry {
    fn into_record(self) -> CommitRecord {
        let signature = self.commit.author;
        CommitRecord {
            commit_hash: self.sha,
            commit_message: self.commit.message,
            commit_author_name: signature
                .as_ref()
                .and_then(|s| s.name.clone())
                .unwrap_or_default(),
            commit_author_avatar: self
                .author
                .and_then(|a| a.avatar_url)
                .unwrap_or_default(),
            commit_date: signature.and_then(|s| s.date).unwrap_or_default(),
        }
    }
}

/// Normalize raw entries: sort by author date descending, keep the top `limit`
pub fn normalize_history(entries: Vec<RawCommitEntry>, limit: usize) -> Vec<CommitRecord> {
    let mut records: Vec<CommitRecord> = entries.into_iter().map(RawCommitEntry::into_record).collect();
    records.sort_by_key(|r| std::cmp::Reverse(parse_commit_date(&r.commit_date)));
    records.truncate(limit);
    records
}

/// Parse an ISO-8601 date, treating unparseable dates as oldest
fn parse_commit_date(date: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
