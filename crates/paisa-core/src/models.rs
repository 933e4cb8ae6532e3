//! Core data types for the text-to-expense pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default merchant used when no extraction strategy succeeds
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Pixel bounding box of an OCR text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// One OCR text block with optional layout geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub bounds: Option<BoundingBox>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, bounds: Option<BoundingBox>) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// One unit of raw extracted text submitted for expense parsing
///
/// Produced by an external collaborator (notification listener, screenshot
/// OCR). When the OCR engine supplies per-block geometry, `blocks` carries
/// it so the pipeline can reconstruct reading order; otherwise `text` is
/// used as-is. Immutable once created, consumed exactly once.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub text: String,
    pub blocks: Vec<TextBlock>,
}

impl RawObservation {
    /// Create an observation from plain text (no layout geometry)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    /// Create an observation from OCR text blocks
    ///
    /// `text` should be the engine's unordered concatenation; it is kept as
    /// the audit copy while `blocks` drives reading-order reconstruction.
    pub fn with_blocks(text: impl Into<String>, blocks: Vec<TextBlock>) -> Self {
        Self {
            text: text.into(),
            blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.blocks.iter().all(|b| b.text.trim().is_empty())
    }
}

/// Whether money left (`debit`) or entered (`credit`) the account
///
/// Defaults to `Debit` when the text is ambiguous. That is a policy choice,
/// not a detection failure: the confirmation UI downstream can flip it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }
}

/// Structured expense produced by the pipeline
///
/// `amount == 0.0` is the "not found" sentinel, distinguished from a hard
/// failure by the caller inspecting `confidence` rather than the value
/// alone. `category` is only ever attached by the downstream confirmation
/// step; this core always emits `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub amount: f64,
    pub merchant: String,
    pub direction: Direction,
    pub category: Option<String>,
    /// 0-100; remote parses report the model's own score, local parses map
    /// the matched strategy tier to its confidence band
    pub confidence: u8,
    /// Original observation text, retained for audit/debugging
    pub raw_text: String,
    /// Capture time, stamped by the orchestrator at completion
    pub timestamp: DateTime<Utc>,
}

impl ExpenseRecord {
    /// True when no amount was found and the record needs manual entry
    pub fn needs_manual_entry(&self) -> bool {
        self.amount <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Debit).unwrap(), "\"debit\"");
        assert_eq!(
            serde_json::from_str::<Direction>("\"credit\"").unwrap(),
            Direction::Credit
        );
    }

    #[test]
    fn test_direction_default_is_debit() {
        assert_eq!(Direction::default(), Direction::Debit);
    }

    #[test]
    fn test_observation_empty_detection() {
        assert!(RawObservation::from_text("   \n  ").is_empty());
        assert!(!RawObservation::from_text("₹100").is_empty());

        let blocks = vec![TextBlock::new("Paid", None)];
        assert!(!RawObservation::with_blocks("", blocks).is_empty());
    }
}
