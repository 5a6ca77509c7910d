//! # Commit Pulse - Commit Ingestion and Summarization Pipeline
//!
//! Links a source-code repository to a knowledge workspace: ingests a GitHub
//! repository's commit history, summarizes each commit's diff with a language
//! model, and durably records the results so a question-answering layer can
//! later answer against that history.
//!
//! ## Overview
//!
//! One poll cycle discovers the most recent commits, determines which are not
//! yet recorded, fetches each new commit's diff, summarizes the diffs
//! concurrently with partial-failure tolerance, and performs a single
//! idempotent batch insert. A commit whose summarization fails is still
//! recorded (with an empty summary) so it is never re-fetched.
//!
//! ## Data flow
//!
//! ```text
//! Locator -> History Fetcher -> Unprocessed-Set Filter
//!                                      |
//!                     (per commit, bounded fan-out)
//!                        Diff Retriever -> Summarizer
//!                                      |
//!                            settle-all join
//!                                      |
//!                          idempotent batch insert
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use commit_pulse::ingest::PulseClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PulseClient::new()?;
//!
//!     let project = client
//!         .create_project("sage", "https://github.com/dialite/sage", None)
//!         .await?;
//!
//!     // Later: pick up whatever is new upstream.
//!     let outcome = client.poll_commits(&project.id).await?;
//!     println!("ingested {} commits", outcome.inserted_count());
//!
//!     Ok(())
//! }
//! ```

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// Source-control host access: commit listing and diff retrieval
pub mod github;

/// Ingestion orchestrator: the poll cycle and the client facade
pub mod ingest;

/// Path normalization and platform directory utilities
pub mod paths;

/// Repository URL parsing
pub mod repo;

/// Durable project and commit persistence
pub mod store;

/// Language-model commit summarization
pub mod summarizer;

/// Core data types shared across the pipeline
pub mod types;

pub use config::Config;
pub use error::PulseError;
pub use ingest::PulseClient;
pub use types::{CommitRecord, PersistedCommit, PollOutcome, Project};
