//! Durable commit store
//!
//! The [`CommitStore`] trait is the pipeline's only shared mutable state:
//! project lookup, the recorded-hash read the unprocessed-set filter needs,
//! and the idempotent batch insert. [`JsonCommitStore`] persists to a JSON
//! file; a database-backed implementation would slot in behind the same trait.

mod json_store;

pub use json_store::JsonCommitStore;

use crate::error::StoreError;
use crate::types::{PersistedCommit, Project};
use std::collections::HashSet;

/// Trait for durable project and commit persistence
#[async_trait::async_trait]
pub trait CommitStore: Send + Sync {
    /// Look up a project by id
    async fn project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;

    /// Create or replace a project
    async fn upsert_project(&self, project: Project) -> Result<(), StoreError>;

    /// All commit hashes already recorded for a project
    async fn recorded_hashes(&self, project_id: &str) -> Result<HashSet<String>, StoreError>;

    /// Insert a batch of summarized commits, returning the rows actually
    /// inserted
    ///
    /// Safe to call with an empty batch. A row whose (`project_id`,
    /// `commit_hash`) pair is already recorded is skipped, not an error, so
    /// a race between two concurrent cycles is benign.
    async fn insert_commits(
        &self,
        batch: Vec<PersistedCommit>,
    ) -> Result<Vec<PersistedCommit>, StoreError>;

    /// All recorded commits for a project, in insertion order
    async fn commits_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<PersistedCommit>, StoreError>;
}
