//! Remote parser backends
//!
//! Backend-agnostic interface for the remote structured-parse tier. Two
//! production wire shapes are supported: a pre-structured endpoint
//! (`StructuredBackend`) and a generative completion endpoint
//! (`GenerativeBackend`), plus a mock for tests.
//!
//! # Architecture
//!
//! - `ParseBackend` trait: the single-attempt parse interface
//! - `ParserClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//!
//! Every failure mode here (non-2xx status, timeout, malformed JSON, empty
//! candidates) is non-fatal to the pipeline: the orchestrator absorbs it
//! and runs the local heuristic extractor instead.
//!
//! # Configuration
//!
//! Environment variables for `ParserClient::from_env`:
//! - `PAISA_PARSE_BACKEND`: Backend to use (structured, generative, mock).
//!   Default: structured
//! - `PAISA_SERVER_URL`: Structured-parse server URL
//! - `PAISA_GENERATIVE_HOST` / `PAISA_GENERATIVE_MODEL` /
//!   `PAISA_GENERATIVE_API_KEY`: Generative endpoint settings
//! - `PAISA_TIMEOUT_SECS`: Request timeout (default: 10)

mod generative;
mod mock;
pub mod parsing;
mod structured;
pub mod types;

pub use generative::GenerativeBackend;
pub use mock::MockBackend;
pub use structured::StructuredBackend;
pub use types::RemoteExpense;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Default remote request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait defining the remote parse interface
///
/// One attempt per call, deadline enforced by the backend; no retries.
#[async_trait]
pub trait ParseBackend: Send + Sync {
    /// Parse already-normalized text into a remote expense
    async fn parse_expense(&self, text: &str) -> Result<RemoteExpense>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Endpoint URL (for logging)
    fn endpoint(&self) -> &str;

    /// Model or backend name (for logging)
    fn model(&self) -> &str;
}

/// Concrete parser client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ParserClient {
    /// Pre-structured parse endpoint
    Structured(StructuredBackend),
    /// Generative completion endpoint
    Generative(GenerativeBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl ParserClient {
    /// Create a structured-parse client
    pub fn structured(base_url: &str, timeout: Duration) -> Self {
        ParserClient::Structured(StructuredBackend::new(base_url, timeout))
    }

    /// Create a generative client
    pub fn generative(base_url: &str, model: &str, timeout: Duration) -> Self {
        ParserClient::Generative(GenerativeBackend::new(base_url, model, timeout))
    }

    /// Create a mock client for testing
    pub fn mock() -> Self {
        ParserClient::Mock(MockBackend::new())
    }

    /// Create a parser client from environment variables
    ///
    /// Returns None if the selected backend's required variables are unset.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("PAISA_PARSE_BACKEND").unwrap_or_else(|_| "structured".to_string());

        match backend.to_lowercase().as_str() {
            "structured" => StructuredBackend::from_env().map(ParserClient::Structured),
            "generative" | "gemini" => GenerativeBackend::from_env().map(ParserClient::Generative),
            "mock" => Some(ParserClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown PAISA_PARSE_BACKEND, falling back to structured");
                StructuredBackend::from_env().map(ParserClient::Structured)
            }
        }
    }
}

// Implement ParseBackend for ParserClient by delegating to the inner backend
#[async_trait]
impl ParseBackend for ParserClient {
    async fn parse_expense(&self, text: &str) -> Result<RemoteExpense> {
        match self {
            ParserClient::Structured(b) => b.parse_expense(text).await,
            ParserClient::Generative(b) => b.parse_expense(text).await,
            ParserClient::Mock(b) => b.parse_expense(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ParserClient::Structured(b) => b.health_check().await,
            ParserClient::Generative(b) => b.health_check().await,
            ParserClient::Mock(b) => b.health_check().await,
        }
    }

    fn endpoint(&self) -> &str {
        match self {
            ParserClient::Structured(b) => b.endpoint(),
            ParserClient::Generative(b) => b.endpoint(),
            ParserClient::Mock(b) => b.endpoint(),
        }
    }

    fn model(&self) -> &str {
        match self {
            ParserClient::Structured(b) => b.model(),
            ParserClient::Generative(b) => b.model(),
            ParserClient::Mock(b) => b.model(),
        }
    }
}
