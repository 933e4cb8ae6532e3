//! Wire types shared by the remote parser backends

use serde::Deserialize;

use crate::models::Direction;

/// Expense fields as returned by a remote parse endpoint
///
/// Both wire shapes (pre-structured and generative) deserialize into this.
/// A zero `amount` is a valid answer, not a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteExpense {
    pub amount: f64,
    pub merchant: String,
    #[serde(rename = "type", default)]
    pub direction: Direction,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub confidence: Option<u8>,
}
