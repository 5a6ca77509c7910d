use super::CommitSummarizer;
use crate::config::SummarizerConfig;
use crate::error::{ConfigError, SummarizeError};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Commit summarizer backed by the Gemini `generateContent` API
pub struct GeminiSummarizer {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_diff_bytes: usize,
}

impl GeminiSummarizer {
    /// Build a summarizer from configuration; the API key is required
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired("summarizer.api_key".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_diff_bytes: config.max_diff_bytes,
        })
    }
}

#[async_trait::async_trait]
impl CommitSummarizer for GeminiSummarizer {
    async fn summarize(&self, diff: &str) -> Result<String, SummarizeError> {
        let prompt = build_prompt(diff, self.max_diff_bytes);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))?;

        extract_text(parsed).ok_or(SummarizeError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull the first candidate's text out of a response, trimmed
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build the summarization prompt, truncating oversized diffs
fn build_prompt(diff: &str, max_diff_bytes: usize) -> String {
    format!(
        "You are an expert programmer summarizing a git diff.\n\
         Reminders about the git diff format:\n\
         For every file there are a few metadata lines, like:\n\
         ```\n\
         diff --git a/lib/index.js b/lib/index.js\n\
         index aadf691..bfef603 100644\n\
         --- a/lib/index.js\n\
         +++ b/lib/index.js\n\
         ```\n\
         A line starting with `+` was added, a line starting with `-` was deleted,\n\
         and other lines are context. Summarize the change in a few short bullet\n\
         points mentioning the files involved. Do not quote the diff back.\n\n\
         Please summarize the following diff:\n\n{}",
        truncate_diff(diff, max_diff_bytes)
    )
}

/// Truncate a diff to at most `max_bytes`, respecting char boundaries
fn truncate_diff(diff: &str, max_bytes: usize) -> &str {
    if diff.len() <= max_bytes {
        return diff;
    }
    let mut end = max_bytes;
    while end > 0 && !diff.is_char_boundary(end) {
        end -= 1;
    }
    &diff[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = SummarizerConfig::default();
        assert!(GeminiSummarizer::new(&config).is_err());

        let config = SummarizerConfig {
            api_key: Some("k".to_string()),
            ..SummarizerConfig::default()
        };
        assert!(GeminiSummarizer::new(&config).is_ok());
    }

    #[test]
    fn test_extract_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "  Added a parser.  "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("Added a parser."));
    }

    #[test]
    fn test_extract_text_empty_cases() {
        let no_candidates: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(no_candidates).is_none());

        let blank_text: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        )
        .unwrap();
        assert!(extract_text(blank_text).is_none());

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(extract_text(no_parts).is_none());
    }

    #[test]
    fn test_prompt_contains_diff() {
        let prompt = build_prompt("+fn main() {}", 1024);
        assert!(prompt.contains("+fn main() {}"));
        assert!(prompt.contains("summarize"));
    }

    #[test]
    fn test_truncate_diff_respects_char_boundary() {
        // 'é' is two bytes; cutting at byte 1 would split it
        let diff = "é";
        assert_eq!(truncate_diff(diff, 1), "");
        assert_eq!(truncate_diff(diff, 2), "é");

        let long = "a".repeat(100);
        assert_eq!(truncate_diff(&long, 10).len(), 10);
    }
}
