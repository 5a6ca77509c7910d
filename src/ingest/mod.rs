//! Ingestion orchestrator
//!
//! One poll cycle resolves a project's repository, fetches its recent commit
//! history, filters to the commits not yet recorded, summarizes their diffs
//! with a bounded concurrent fan-out, and performs a single idempotent batch
//! insert. Failures before the fan-out abort the cycle; failures inside it
//! degrade the affected commit's summary to an empty string and nothing else.

pub mod filter;

pub use filter::filter_unprocessed;

use crate::config::Config;
use crate::error::{PulseError, StoreError};
use crate::github::{GithubClient, SourceHost};
use crate::repo::RepoRef;
use crate::store::{CommitStore, JsonCommitStore};
use crate::summarizer::{CommitSummarizer, GeminiSummarizer};
use crate::types::{PersistedCommit, PollOutcome, Project};
use anyhow::{Context, Result};
use futures::future;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;

/// Run one ingestion cycle for one project
///
/// Generic over the three collaborator seams so tests can drive the cycle
/// with a fake host, summarizer, or store. `max_concurrency` bounds the
/// number of in-flight diff-fetch-and-summarize units.
pub async fn run_poll_cycle<H, M, S>(
    host: Arc<H>,
    summarizer: Arc<M>,
    store: Arc<S>,
    project_id: &str,
    max_concurrency: usize,
) -> Result<PollOutcome, PulseError>
where
    H: SourceHost + 'static,
    M: CommitSummarizer + 'static,
    S: CommitStore,
{
    let Some(project) = store.project(project_id).await? else {
        return Err(StoreError::ProjectNotFound(project_id.to_string()).into());
    };

    // A project may legitimately have no linked repository yet during setup.
    let Some(repo_url) = project.repo_url() else {
        tracing::debug!(project_id, "project has no linked repository, skipping poll");
        return Ok(PollOutcome::NotConfigured);
    };

    let repo = RepoRef::parse(repo_url)?;
    let history = host
        .list_commits(&repo, project.github_token.as_deref())
        .await?;
    tracing::info!(project_id, repo = %repo, count = history.len(), "fetched commit history");

    let recorded = store.recorded_hashes(project_id).await?;
    let unprocessed = filter_unprocessed(&recorded, history);
    if unprocessed.is_empty() {
        tracing::debug!(project_id, "no unprocessed commits");
        return Ok(PollOutcome::UpToDate);
    }
    tracing::info!(
        project_id,
        count = unprocessed.len(),
        "summarizing unprocessed commits"
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let handles: Vec<_> = unprocessed
        .iter()
        .map(|commit| {
            let host = Arc::clone(&host);
            let summarizer = Arc::clone(&summarizer);
            let semaphore = Arc::clone(&semaphore);
            let repo_url = repo_url.to_string();
            let hash = commit.commit_hash.clone();
            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PulseError::Other(format!("semaphore closed: {e}")))?;
                let diff = host.fetch_diff(&repo_url, &hash).await?;
                let summary = summarizer.summarize(&diff).await?;
                Ok::<String, PulseError>(summary)
            })
        })
        .collect();

    // Settle-all: every unit reports fulfilled or failed; a failed or
    // panicked unit degrades to an empty summary without touching siblings.
    let mut summaries = Vec::with_capacity(handles.len());
    for (commit, joined) in unprocessed.iter().zip(future::join_all(handles).await) {
        let summary = match joined {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(commit = %commit.commit_hash, error = %e, "summarization unit failed");
                String::new()
            }
            Err(e) => {
                tracing::warn!(commit = %commit.commit_hash, error = %e, "summarization unit panicked");
                String::new()
            }
        };
        summaries.push(summary);
    }

    let batch: Vec<PersistedCommit> = unprocessed
        .into_iter()
        .zip(summaries)
        .map(|(record, summary)| PersistedCommit::from_record(project_id, record, summary))
        .collect();

    let inserted = store.insert_commits(batch).await?;
    tracing::info!(project_id, inserted = inserted.len(), "recorded summarized commits");
    Ok(PollOutcome::Ingested(inserted))
}

/// Facade over the ingestion pipeline and its collaborators
///
/// Owns the host client, summarizer, and store, and serializes cycles per
/// project so two polls for the same project cannot interleave in-process.
/// Defaults to the production collaborators; tests instantiate it with fakes
/// through [`PulseClient::with_parts`].
pub struct PulseClient<H = GithubClient, M = GeminiSummarizer, S = JsonCommitStore> {
    host: Arc<H>,
    summarizer: Arc<M>,
    store: Arc<S>,
    config: Arc<Config>,
    poll_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl<H, M, S> Clone for PulseClient<H, M, S> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            summarizer: Arc::clone(&self.summarizer),
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            poll_locks: Arc::clone(&self.poll_locks),
        }
    }
}

impl PulseClient {
    /// Create a client from the default configuration sources
    pub fn new() -> Result<Self> {
        Self::with_config(Config::new()?)
    }

    /// Create a client with the production collaborators from `config`
    pub fn with_config(config: Config) -> Result<Self> {
        let host = GithubClient::new(&config.github).context("Failed to build GitHub client")?;
        let summarizer =
            GeminiSummarizer::new(&config.summarizer).context("Failed to build summarizer")?;
        let store = JsonCommitStore::open(&config.store.path)
            .context("Failed to open commit store")?;
        Ok(Self::with_parts(host, summarizer, store, config))
    }
}

impl<H, M, S> PulseClient<H, M, S>
where
    H: SourceHost + 'static,
    M: CommitSummarizer + 'static,
    S: CommitStore + 'static,
{
    /// Assemble a client from explicit collaborators
    pub fn with_parts(host: H, summarizer: M, store: S, config: Config) -> Self {
        Self {
            host: Arc::new(host),
            summarizer: Arc::new(summarizer),
            store: Arc::new(store),
            config: Arc::new(config),
            poll_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The durable store behind this client
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn project_poll_lock(&self, project_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.poll_locks.lock().await;
        locks
            .entry(project_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run one ingestion cycle for `project_id`, awaited
    ///
    /// Cycles for the same project are serialized; the store's idempotent
    /// insert is the backstop for races this process cannot see.
    pub async fn poll_commits(&self, project_id: &str) -> Result<PollOutcome, PulseError> {
        let lock = self.project_poll_lock(project_id).await;
        let _guard = lock.lock().await;
        run_poll_cycle(
            Arc::clone(&self.host),
            Arc::clone(&self.summarizer),
            Arc::clone(&self.store),
            project_id,
            self.config.ingest.max_concurrency,
        )
        .await
    }

    /// Run one ingestion cycle detached from the caller
    ///
    /// The triggering caller is never blocked or failed by ingestion
    /// problems: the outcome is logged and errors are swallowed. The handle
    /// is returned for callers that do want to wait.
    pub fn poll_commits_detached(&self, project_id: &str) -> JoinHandle<()> {
        let client = self.clone();
        let project_id = project_id.to_string();
        tokio::spawn(async move {
            match client.poll_commits(&project_id).await {
                Ok(outcome) => tracing::debug!(
                    project_id = %project_id,
                    inserted = outcome.inserted_count(),
                    "detached poll finished"
                ),
                Err(e) => tracing::warn!(
                    project_id = %project_id,
                    error = %e,
                    "detached poll failed"
                ),
            }
        })
    }

    /// Register a project and run its first ingestion cycle synchronously
    pub async fn create_project(
        &self,
        name: &str,
        github_url: &str,
        github_token: Option<String>,
    ) -> Result<Project, PulseError> {
        // Reject malformed URLs before anything is written.
        RepoRef::parse(github_url)?;

        let mut project = Project::new(name, Some(github_url.to_string()));
        project.github_token = github_token;
        self.store.upsert_project(project.clone()).await?;

        let outcome = self.poll_commits(&project.id).await?;
        tracing::info!(
            project_id = %project.id,
            inserted = outcome.inserted_count(),
            "created project and ran first poll"
        );
        Ok(project)
    }

    /// Recorded commits for a project, with an opportunistic detached re-poll
    pub async fn project_commits(
        &self,
        project_id: &str,
    ) -> Result<Vec<PersistedCommit>, PulseError> {
        self.poll_commits_detached(project_id);
        Ok(self.store.commits_for_project(project_id).await?)
    }
}
