use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A commit as fetched from the source-control host
///
/// Immutable once returned by the fetcher; history is ordered by
/// `commit_date` descending before truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash (hex digest)
    pub commit_hash: String,
    /// Commit message (first line and body)
    pub commit_message: String,
    /// Author's name
    pub commit_author_name: String,
    /// Author's avatar URL, empty when the host has none
    pub commit_author_avatar: String,
    /// Author date as an ISO-8601 string
    pub commit_date: String,
}

/// A summarized commit as recorded in the durable store
///
/// At most one row exists per (`project_id`, `commit_hash`) pair. Rows are
/// created by the ingestion orchestrator's batch insert and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCommit {
    /// Owning project identifier
    pub project_id: String,
    /// Full commit hash (hex digest)
    pub commit_hash: String,
    /// Commit message
    pub commit_message: String,
    /// Author's name
    pub commit_author_name: String,
    /// Author's avatar URL, may be empty
    pub commit_author_avatar: String,
    /// Author date as an ISO-8601 string
    pub commit_date: String,
    /// Language-model summary of the commit diff, empty when
    /// summarization failed
    pub summary: String,
}

impl PersistedCommit {
    /// Pair a fetched record with its summary under a project
    pub fn from_record(project_id: impl Into<String>, record: CommitRecord, summary: String) -> Self {
        Self {
            project_id: project_id.into(),
            commit_hash: record.commit_hash,
            commit_message: record.commit_message,
            commit_author_name: record.commit_author_name,
            commit_author_avatar: record.commit_author_avatar,
            commit_date: record.commit_date,
            summary,
        }
    }
}

/// A project linking a knowledge workspace to a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable project identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Linked repository URL; `None` while the project is still being set up
    pub github_url: Option<String>,
    /// Optional access token overriding the global host credential
    #[serde(default)]
    pub github_token: Option<String>,
}

impl Project {
    /// Create a project with an id derived from its name and repository URL
    pub fn new(name: impl Into<String>, github_url: Option<String>) -> Self {
        let name = name.into();
        let id = Self::derive_id(&name, github_url.as_deref().unwrap_or(""));
        Self {
            id,
            name,
            github_url,
            github_token: None,
        }
    }

    /// Derive a stable short id from the project name and repository URL
    pub fn derive_id(name: &str, github_url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
        hasher.update(github_url.as_bytes());
        let digest = hasher.finalize();
        // 12 hex chars is plenty for a single-user store
        digest.iter().take(6).map(|b| format!("{:02x}", b)).collect()
    }

    /// The repository URL, treating an empty string as not configured
    pub fn repo_url(&self) -> Option<&str> {
        self.github_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Outcome of one ingestion cycle for one project
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The project has no linked repository yet; nothing was fetched or written
    NotConfigured,
    /// Every commit in the fetched history was already recorded
    UpToDate,
    /// Newly inserted rows, in history order
    Ingested(Vec<PersistedCommit>),
}

impl PollOutcome {
    /// Rows inserted by this cycle (empty for the no-op outcomes)
    pub fn inserted(&self) -> &[PersistedCommit] {
        match self {
            PollOutcome::Ingested(rows) => rows,
            _ => &[],
        }
    }

    /// Number of rows inserted by this cycle
    pub fn inserted_count(&self) -> usize {
        self.inserted().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str) -> CommitRecord {
        CommitRecord {
            commit_hash: hash.to_string(),
            commit_message: "fix: widget".to_string(),
            commit_author_name: "Ada".to_string(),
            commit_author_avatar: String::new(),
            commit_date: "2024-05-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_persisted_from_record() {
        let row = PersistedCommit::from_record("proj-1", record("abc123"), "did things".to_string());
        assert_eq!(row.project_id, "proj-1");
        assert_eq!(row.commit_hash, "abc123");
        assert_eq!(row.summary, "did things");
        assert_eq!(row.commit_author_name, "Ada");
    }

    #[test]
    fn test_derive_id_is_stable() {
        let a = Project::derive_id("sage", "https://github.com/dialite/sage");
        let b = Project::derive_id("sage", "https://github.com/dialite/sage");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_derive_id_differs_by_url() {
        let a = Project::derive_id("sage", "https://github.com/dialite/sage");
        let b = Project::derive_id("sage", "https://github.com/dialite/other");
        assert_ne!(a, b);
    }

    #[test]
    fn test_repo_url_treats_empty_as_unconfigured() {
        let mut project = Project::new("sage", Some(String::new()));
        assert_eq!(project.repo_url(), None);
        project.github_url = Some("https://github.com/dialite/sage".to_string());
        assert_eq!(project.repo_url(), Some("https://github.com/dialite/sage"));
        project.github_url = None;
        assert_eq!(project.repo_url(), None);
    }

    #[test]
    fn test_poll_outcome_counts() {
        assert_eq!(PollOutcome::NotConfigured.inserted_count(), 0);
        assert_eq!(PollOutcome::UpToDate.inserted_count(), 0);
        let row = PersistedCommit::from_record("p", record("abc"), String::new());
        assert_eq!(PollOutcome::Ingested(vec![row]).inserted_count(), 1);
    }

    #[test]
    fn test_commit_record_serde_roundtrip() {
        let rec = record("abc123");
        let json = serde_json::to_string(&rec).unwrap();
        let back: CommitRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
