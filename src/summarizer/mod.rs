//! Commit summarization
//!
//! The [`CommitSummarizer`] trait turns a unified diff into prose. The
//! production implementation calls a Gemini-style HTTP API; the ingestion
//! orchestrator treats every failure here as "no summary", never as fatal.

mod gemini;

pub use gemini::GeminiSummarizer;

use crate::error::SummarizeError;

/// Trait for language-model commit summarization
#[async_trait::async_trait]
pub trait CommitSummarizer: Send + Sync {
    /// Summarize a unified diff into a short prose description
    async fn summarize(&self, diff: &str) -> Result<String, SummarizeError>;
}
