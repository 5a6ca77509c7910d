use super::SourceHost;
use super::history::{RawCommitEntry, normalize_history};
use crate::config::GithubConfig;
use crate::error::{DiffError, HistoryError};
use crate::repo::RepoRef;
use crate::types::CommitRecord;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use std::time::Duration;

const USER_AGENT: &str = concat!("commit-pulse/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub REST API and its diff endpoint
///
/// Constructed once and passed in wherever host access is needed, so tests
/// can substitute a fake [`SourceHost`] without process-wide state.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
    history_limit: usize,
}

impl GithubClient {
    /// Build a client from configuration
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            history_limit: config.history_limit,
        })
    }
}

#[async_trait::async_trait]
impl SourceHost for GithubClient {
    async fn list_commits(
        &self,
        repo: &RepoRef,
        token_override: Option<&str>,
    ) -> Result<Vec<CommitRecord>, HistoryError> {
        let url = format!("{}/repos/{}/{}/commits", self.api_base, repo.owner, repo.name);
        tracing::debug!(%url, "listing commits");

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = token_override.or(self.token.as_deref()) {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HistoryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(HistoryError::RateLimited);
        }
        if !status.is_success() {
            return Err(HistoryError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let entries: Vec<RawCommitEntry> = response
            .json()
            .await
            .map_err(|e| HistoryError::MalformedResponse(e.to_string()))?;

        Ok(normalize_history(entries, self.history_limit))
    }

    async fn fetch_diff(&self, repo_url: &str, commit_hash: &str) -> Result<String, DiffError> {
        let url = format!("{}/commit/{}.diff", repo_url.trim_end_matches('/'), commit_hash);
        tracing::debug!(%url, "fetching diff");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github.v3.diff")
            .send()
            .await
            .map_err(|e| DiffError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiffError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        response
            .text()
            .await
            .map_err(|e| DiffError::RequestFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        let client = GithubClient::new(&GithubConfig::default()).unwrap();
        assert_eq!(client.api_base, "https://api.github.com");
        assert_eq!(client.history_limit, 10);
        assert!(client.token.is_none());
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let config = GithubConfig {
            api_base: "https://ghe.example/api/v3/".to_string(),
            ..GithubConfig::default()
        };
        let client = GithubClient::new(&config).unwrap();
        assert_eq!(client.api_base, "https://ghe.example/api/v3");
    }
}
