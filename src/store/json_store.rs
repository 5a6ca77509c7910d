use super::CommitStore;
use crate::error::StoreError;
use crate::types::{PersistedCommit, Project};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// JSON-file-backed commit store
///
/// State is held in memory behind an async `RwLock` and written back to disk
/// on every mutation. Suitable for a single process; concurrent cycles within
/// that process are safe because mutation holds the write lock across the
/// duplicate check and the insert.
pub struct JsonCommitStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreState {
    /// Map of project id -> project
    projects: HashMap<String, Project>,
    /// Map of project id -> recorded commits, in insertion order
    commits: HashMap<String, Vec<PersistedCommit>>,
}

impl JsonCommitStore {
    /// Open a store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = Self::load(&path)?;
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn load(path: &Path) -> Result<StoreState, StoreError> {
        if !path.exists() {
            tracing::debug!("Store file not found, starting with empty store");
            return Ok(StoreState::default());
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let state: StoreState =
            serde_json::from_str(&content).map_err(|e| StoreError::ParseFailed(e.to_string()))?;

        tracing::info!(
            "Loaded store with {} projects and {} commits",
            state.projects.len(),
            state.commits.values().map(Vec::len).sum::<usize>()
        );
        Ok(state)
    }

    fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::SaveFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let content =
            serde_json::to_string_pretty(state).map_err(|e| StoreError::SaveFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        fs::write(&self.path, content).map_err(|e| StoreError::SaveFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Saved store to {:?}", self.path);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CommitStore for JsonCommitStore {
    async fn project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        let state = self.state.read().await;
        Ok(state.projects.get(project_id).cloned())
    }

    async fn upsert_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.projects.insert(project.id.clone(), project);
        self.save(&state)
    }

    async fn recorded_hashes(&self, project_id: &str) -> Result<HashSet<String>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .commits
            .get(project_id)
            .map(|rows| rows.iter().map(|r| r.commit_hash.clone()).collect())
            .unwrap_or_default())
    }

    async fn insert_commits(
        &self,
        batch: Vec<PersistedCommit>,
    ) -> Result<Vec<PersistedCommit>, StoreError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = self.state.write().await;
        let mut inserted = Vec::with_capacity(batch.len());

        for row in batch {
            let rows = state.commits.entry(row.project_id.clone()).or_default();
            if rows.iter().any(|existing| existing.commit_hash == row.commit_hash) {
                tracing::debug!(
                    project_id = %row.project_id,
                    commit = %row.commit_hash,
                    "skipping already recorded commit"
                );
                continue;
            }
            rows.push(row.clone());
            inserted.push(row);
        }

        if !inserted.is_empty() {
            self.save(&state)?;
        }
        Ok(inserted)
    }

    async fn commits_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<PersistedCommit>, StoreError> {
        let state = self.state.read().await;
        Ok(state.commits.get(project_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommitRecord;
    use tempfile::tempdir;

    fn record(hash: &str) -> CommitRecord {
        CommitRecord {
            commit_hash: hash.to_string(),
            commit_message: format!("commit {hash}"),
            commit_author_name: "Ada".to_string(),
            commit_author_avatar: String::new(),
            commit_date: "2024-05-01T12:00:00Z".to_string(),
        }
    }

    fn row(project_id: &str, hash: &str) -> PersistedCommit {
        PersistedCommit::from_record(project_id, record(hash), format!("summary {hash}"))
    }

    #[tokio::test]
    async fn test_open_nonexistent_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonCommitStore::open(dir.path().join("commits.json")).unwrap();
        assert!(store.project("missing").await.unwrap().is_none());
        assert!(store.recorded_hashes("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_project_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonCommitStore::open(dir.path().join("commits.json")).unwrap();

        let project = Project::new("sage", Some("https://github.com/dialite/sage".to_string()));
        let id = project.id.clone();
        store.upsert_project(project).await.unwrap();

        let found = store.project(&id).await.unwrap().unwrap();
        assert_eq!(found.name, "sage");
    }

    #[tokio::test]
    async fn test_insert_skips_duplicates() {
        let dir = tempdir().unwrap();
        let store = JsonCommitStore::open(dir.path().join("commits.json")).unwrap();

        let inserted = store
            .insert_commits(vec![row("p1", "aaa"), row("p1", "bbb")])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);

        // A second cycle racing on the same hash loses quietly
        let inserted = store
            .insert_commits(vec![row("p1", "bbb"), row("p1", "ccc")])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].commit_hash, "ccc");

        let hashes = store.recorded_hashes("p1").await.unwrap();
        assert_eq!(hashes.len(), 3);
    }

    #[tokio::test]
    async fn test_insert_empty_batch() {
        let dir = tempdir().unwrap();
        let store = JsonCommitStore::open(dir.path().join("commits.json")).unwrap();
        let inserted = store.insert_commits(Vec::new()).await.unwrap();
        assert!(inserted.is_empty());
        // No file is written for a no-op insert
        assert!(!dir.path().join("commits.json").exists());
    }

    #[tokio::test]
    async fn test_commits_isolated_per_project() {
        let dir = tempdir().unwrap();
        let store = JsonCommitStore::open(dir.path().join("commits.json")).unwrap();

        store
            .insert_commits(vec![row("p1", "aaa"), row("p2", "aaa")])
            .await
            .unwrap();

        assert_eq!(store.commits_for_project("p1").await.unwrap().len(), 1);
        assert_eq!(store.commits_for_project("p2").await.unwrap().len(), 1);
        assert!(store.recorded_hashes("p3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commits.json");

        {
            let store = JsonCommitStore::open(&path).unwrap();
            let project = Project::new("sage", Some("https://github.com/a/b".to_string()));
            let id = project.id.clone();
            store.upsert_project(project).await.unwrap();
            store
                .insert_commits(vec![row(&id, "aaa"), row(&id, "bbb")])
                .await
                .unwrap();
        }

        let reopened = JsonCommitStore::open(&path).unwrap();
        let id = Project::derive_id("sage", "https://github.com/a/b");
        assert!(reopened.project(&id).await.unwrap().is_some());
        assert_eq!(reopened.recorded_hashes(&id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/commits.json");
        let store = JsonCommitStore::open(&path).unwrap();
        store
            .upsert_project(Project::new("p", None))
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("commits.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonCommitStore::open(&path),
            Err(StoreError::ParseFailed(_))
        ));
    }
}
