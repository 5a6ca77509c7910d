/// Centralized error types for commit-pulse using thiserror
///
/// Provides domain-specific error types so callers can tell a fatal cycle
/// failure apart from a per-commit failure that degrades to an empty summary.
use thiserror::Error;

/// Main error type for the ingestion pipeline
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Repository reference error: {0}")]
    Repo(#[from] RepoRefError),

    #[error("History fetch error: {0}")]
    History(#[from] HistoryError),

    #[error("Diff fetch error: {0}")]
    Diff(#[from] DiffError),

    #[error("Summarization error: {0}")]
    Summarize(#[from] SummarizeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors from parsing a repository URL into an owner/name pair
#[derive(Error, Debug)]
pub enum RepoRefError {
    #[error("Repository URL is empty")]
    EmptyUrl,

    #[error("Repository URL has fewer than two path segments: {0}")]
    MissingSegments(String),
}

/// Errors from listing commit history on the source-control host
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Commit listing request failed: {0}")]
    RequestFailed(String),

    #[error("Source-control host rate limit exceeded")]
    RateLimited,

    #[error("Commit listing returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Failed to parse commit listing response: {0}")]
    MalformedResponse(String),
}

/// Errors from fetching a single commit's unified diff
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Diff request failed: {0}")]
    RequestFailed(String),

    #[error("Diff request returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },
}

/// Errors from the language-model summarization call
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Summarization request failed: {0}")]
    RequestFailed(String),

    #[error("Summarization returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Summarization returned no text")]
    EmptyResponse,

    #[error("Failed to parse summarization response: {0}")]
    MalformedResponse(String),
}

/// Errors from the durable commit store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load store from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Failed to save store to '{path}': {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Failed to parse store file: {0}")]
    ParseFailed(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

// Conversion from anyhow::Error to PulseError
impl From<anyhow::Error> for PulseError {
    fn from(err: anyhow::Error) -> Self {
        PulseError::Other(format!("{:#}", err))
    }
}

impl PulseError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        PulseError::Other(msg.into())
    }

    /// Check if this is a user error (bad input) vs a system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PulseError::Repo(_)
                | PulseError::Config(ConfigError::InvalidValue { .. })
                | PulseError::Store(StoreError::ProjectNotFound(_))
        )
    }

    /// Check if retrying the whole cycle later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PulseError::History(HistoryError::RequestFailed(_))
                | PulseError::History(HistoryError::RateLimited)
                | PulseError::Io(_)
        )
    }
}
