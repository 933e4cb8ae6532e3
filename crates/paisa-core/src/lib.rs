//! Paisa Core Library
//!
//! Shared functionality for the Paisa expense capture tool:
//! - OCR text normalization and reading-order reconstruction
//! - Currency enhancement for mis-recognized rupee markers
//! - Tiered heuristic extraction (amount, merchant, direction)
//! - Pluggable remote parse backends (structured server, generative API)
//! - SMS/notification timestamp recovery
//! - Financial-text screening for capture triggers
//! - Pipeline orchestrator with remote-first, local-fallback flow

pub mod enhance;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod remote;
pub mod screen;
pub mod timestamp;

/// Test utilities including the mock parse server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use enhance::enhance;
pub use error::{Error, Result};
pub use extract::{AmountTier, ExtractorConfig, HeuristicExtractor};
pub use models::{
    BoundingBox, Direction, ExpenseRecord, RawObservation, TextBlock, UNKNOWN_MERCHANT,
};
pub use normalize::{normalize, reading_order};
pub use pipeline::{ExpensePipeline, PipelineConfig};
pub use remote::{
    GenerativeBackend, MockBackend, ParseBackend, ParserClient, RemoteExpense, StructuredBackend,
    DEFAULT_TIMEOUT,
};
pub use screen::is_financial_text;
pub use timestamp::{matches_sms_format, parse_sms_timestamp};
