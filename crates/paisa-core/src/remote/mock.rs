//! Mock backend for testing
//!
//! Deterministic stand-in for the remote parser. By default it answers
//! with a fixed parse; it can be configured with a canned expense or made
//! to fail every call to exercise the fallback path.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::Direction;

use super::types::RemoteExpense;
use super::ParseBackend;

/// Mock parse backend
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Canned reply; `None` means derive a simple keyword-based answer
    pub response: Option<RemoteExpense>,
    /// When set, every parse call fails (simulates an unreachable server)
    pub failing: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that always answers with the given expense
    pub fn with_response(response: RemoteExpense) -> Self {
        Self {
            response: Some(response),
            failing: false,
        }
    }

    /// Mock that fails every parse call
    pub fn failing() -> Self {
        Self {
            response: None,
            failing: true,
        }
    }
}

#[async_trait]
impl ParseBackend for MockBackend {
    async fn parse_expense(&self, text: &str) -> Result<RemoteExpense> {
        if self.failing {
            return Err(Error::RemoteRejected("mock backend set to fail".into()));
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        // Keyword-based canned logic, predictable for tests
        let lower = text.to_lowercase();
        let direction = if lower.contains("received") || lower.contains("refund") {
            Direction::Credit
        } else {
            Direction::Debit
        };
        let merchant = if lower.contains("swiggy") {
            "Swiggy"
        } else if lower.contains("zomato") {
            "Zomato"
        } else {
            "Payment"
        };

        Ok(RemoteExpense {
            amount: 100.0,
            merchant: merchant.to_string(),
            direction,
            category: None,
            confidence: Some(90),
        })
    }

    async fn health_check(&self) -> bool {
        !self.failing
    }

    fn endpoint(&self) -> &str {
        "mock://localhost"
    }

    fn model(&self) -> &str {
        "mock"
    }
}
