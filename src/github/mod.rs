//! Source-control host access
//!
//! The [`SourceHost`] trait is the seam between the ingestion pipeline and
//! the remote host: commit-history listing and per-commit diff retrieval.
//! [`GithubClient`] is the production implementation; tests substitute fakes.

mod client;
pub mod history;

pub use client::GithubClient;

use crate::error::{DiffError, HistoryError};
use crate::repo::RepoRef;
use crate::types::CommitRecord;

/// Trait for source-control host operations
#[async_trait::async_trait]
pub trait SourceHost: Send + Sync {
    /// List the most recent commits of a repository, normalized and ordered
    /// newest-first
    ///
    /// `token_override` substitutes the client-level credential for this call
    /// (a project may carry its own access token).
    async fn list_commits(
        &self,
        repo: &RepoRef,
        token_override: Option<&str>,
    ) -> Result<Vec<CommitRecord>, HistoryError>;

    /// Fetch the unified diff text for a single commit
    async fn fetch_diff(&self, repo_url: &str, commit_hash: &str) -> Result<String, DiffError>;
}
