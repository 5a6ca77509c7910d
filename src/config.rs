/// Configuration system for commit-pulse
///
/// Supports loading from multiple sources with priority:
/// Environment variables > Config file > Defaults
use crate::error::{ConfigError, PulseError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Source-control host configuration
    #[serde(default)]
    pub github: GithubConfig,

    /// Summarization service configuration
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Ingestion pipeline configuration
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Durable store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Source-control host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Host API base URL
    #[serde(default = "default_github_api_base")]
    pub api_base: String,

    /// Access token for the host API (raises rate limits, grants private access)
    #[serde(default)]
    pub token: Option<String>,

    /// How many of the most recent commits one cycle considers
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Timeout in seconds for each outbound host request
    #[serde(default = "default_github_timeout")]
    pub request_timeout_secs: u64,
}

/// Summarization service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Summarization API base URL
    #[serde(default = "default_summarizer_api_base")]
    pub api_base: String,

    /// API key for the summarization service
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name used for summarization
    #[serde(default = "default_summarizer_model")]
    pub model: String,

    /// Timeout in seconds for each summarization request
    #[serde(default = "default_summarizer_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum diff size in bytes sent to the model; larger diffs are truncated
    #[serde(default = "default_max_diff_bytes")]
    pub max_diff_bytes: usize,
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Upper bound on concurrent diff-fetch-and-summarize units
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// Durable store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON store file path
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_history_limit() -> usize {
    10
}

fn default_github_timeout() -> u64 {
    30
}

fn default_summarizer_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_summarizer_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_summarizer_timeout() -> u64 {
    60
}

fn default_max_diff_bytes() -> usize {
    65_536 // 64 KiB
}

fn default_max_concurrency() -> usize {
    8
}

fn default_store_path() -> PathBuf {
    crate::paths::PlatformPaths::default_store_path()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            token: None,
            history_limit: default_history_limit(),
            request_timeout_secs: default_github_timeout(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_base: default_summarizer_api_base(),
            api_key: None,
            model: default_summarizer_model(),
            request_timeout_secs: default_summarizer_timeout(),
            max_diff_bytes: default_max_diff_bytes(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, PulseError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location or fall back to defaults
    pub fn load_or_default() -> Result<Self, PulseError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), PulseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), PulseError> {
        if self.github.api_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "github.api_base".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.github.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "github.history_limit".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.github.request_timeout_secs == 0 || self.summarizer.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.summarizer.max_diff_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "summarizer.max_diff_bytes".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.ingest.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ingest.max_concurrency".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_base) = std::env::var("COMMIT_PULSE_GITHUB_API") {
            self.github.api_base = api_base;
        }

        if let Ok(token) = std::env::var("COMMIT_PULSE_GITHUB_TOKEN") {
            self.github.token = Some(token);
        }

        if let Ok(limit) = std::env::var("COMMIT_PULSE_HISTORY_LIMIT")
            && let Ok(limit) = limit.parse()
        {
            self.github.history_limit = limit;
        }

        if let Ok(api_key) = std::env::var("COMMIT_PULSE_GEMINI_API_KEY") {
            self.summarizer.api_key = Some(api_key);
        }

        if let Ok(model) = std::env::var("COMMIT_PULSE_SUMMARIZER_MODEL") {
            self.summarizer.model = model;
        }

        if let Ok(path) = std::env::var("COMMIT_PULSE_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Ok(concurrency) = std::env::var("COMMIT_PULSE_MAX_CONCURRENCY")
            && let Ok(concurrency) = concurrency.parse()
        {
            self.ingest.max_concurrency = concurrency;
        }
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, PulseError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}
