//! Structured-parse backend
//!
//! Client adapter for a companion server exposing `POST /api/ocr/parse`:
//! request `{"text": "<ocr text>"}`, response
//! `{"success": bool, "data": {"amount", "merchant", "type", ...}}`.
//! Single attempt per observation; any failure is handed to the local
//! fallback by the orchestrator, never retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::types::RemoteExpense;
use super::{ParseBackend, DEFAULT_TIMEOUT};

/// Backend for the pre-structured parse endpoint
#[derive(Clone)]
pub struct StructuredBackend {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl StructuredBackend {
    /// Create a new structured-parse backend
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Create from environment variables
    ///
    /// Required: `PAISA_SERVER_URL`
    /// Optional: `PAISA_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("PAISA_SERVER_URL").ok()?;
        let timeout = std::env::var("PAISA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Some(Self::new(&url, timeout))
    }
}

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    success: bool,
    data: Option<RemoteExpense>,
}

#[async_trait]
impl ParseBackend for StructuredBackend {
    async fn parse_expense(&self, text: &str) -> Result<RemoteExpense> {
        let response = self
            .http_client
            .post(format!("{}/api/ocr/parse", self.base_url))
            .timeout(self.timeout)
            .json(&ParseRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteRejected(format!("{}: {}", status, body)));
        }

        let parsed: ParseResponse = response.json().await?;
        if !parsed.success {
            return Err(Error::RemoteRejected("server returned success=false".into()));
        }

        let expense = parsed
            .data
            .ok_or_else(|| Error::InvalidData("parse response carried no data".into()))?;

        if expense.amount <= 0.0 {
            warn!(merchant = %expense.merchant, "remote parse returned zero amount");
        }
        debug!(
            amount = expense.amount,
            merchant = %expense.merchant,
            direction = expense.direction.as_str(),
            "structured parse succeeded"
        );

        Ok(expense)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn model(&self) -> &str {
        "structured"
    }
}
