//! Generative backend
//!
//! Client adapter for a Gemini-style `generateContent` endpoint. The OCR
//! text is embedded in an instructional prompt; the completion body is
//! expected to be a JSON object, possibly wrapped in markdown code fences
//! that must be stripped before parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::prompts::build_parse_prompt;

use super::parsing::parse_remote_expense;
use super::types::RemoteExpense;
use super::{ParseBackend, DEFAULT_TIMEOUT};

/// Backend for generative text-completion endpoints
#[derive(Clone)]
pub struct GenerativeBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GenerativeBackend {
    /// Create a new generative backend
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            timeout,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Self {
        let mut backend = Self::new(base_url, model, timeout);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Create from environment variables
    ///
    /// Required: `PAISA_GENERATIVE_HOST`
    /// Optional: `PAISA_GENERATIVE_MODEL` (default: gemini-1.5-flash),
    /// `PAISA_GENERATIVE_API_KEY`, `PAISA_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("PAISA_GENERATIVE_HOST").ok()?;
        let model = std::env::var("PAISA_GENERATIVE_MODEL")
            .unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let timeout = std::env::var("PAISA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut backend = Self::new(&host, &model, timeout);
        backend.api_key = std::env::var("PAISA_GENERATIVE_API_KEY").ok();
        Some(backend)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl ParseBackend for GenerativeBackend {
    async fn parse_expense(&self, text: &str) -> Result<RemoteExpense> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_parse_prompt(text),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.1 },
        };

        let mut req_builder = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .timeout(self.timeout)
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("x-goog-api-key", api_key);
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteRejected(format!("{}: {}", status, body)));
        }

        let generated: GenerateResponse = response.json().await?;
        let candidate = generated
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidData("empty candidates in completion".into()))?;

        let completion: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        debug!(completion = %completion, "generative completion received");

        let expense = parse_remote_expense(&completion)?;
        if expense.amount <= 0.0 {
            warn!(merchant = %expense.merchant, "generative parse returned zero amount");
        }

        Ok(expense)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
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
        &self.model
    }
}
