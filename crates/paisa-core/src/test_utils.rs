//! Test utilities for paisa-core
//!
//! This module provides testing infrastructure including a mock parse
//! server that speaks both remote wire shapes (structured and generative)
//! for development and integration tests.

use axum::{
    extract::Json,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock parse server for testing and development
///
/// Serves the structured endpoint (`POST /api/ocr/parse`, `GET /health`)
/// and a generative `generateContent` endpoint that replies with a
/// code-fenced JSON completion. Request text containing `SLOW` stalls the
/// handler long enough to trip client timeouts; text containing `FAIL`
/// produces a rejected parse.
pub struct MockParseServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockParseServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/api/ocr/parse", post(handle_parse))
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/*rest", post(handle_generate));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockParseServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn handle_models() -> Json<Value> {
    Json(json!({"models": [{"name": "gemini-1.5-flash"}]}))
}

#[derive(Debug, Deserialize)]
struct ParseRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct ParseResponse {
    success: bool,
    data: Option<Value>,
}

/// Structured parse endpoint
async fn handle_parse(
    Json(request): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, StatusCode> {
    maybe_stall(&request.text).await;

    if request.text.contains("FAIL") {
        return Ok(Json(ParseResponse {
            success: false,
            data: None,
        }));
    }
    if request.text.contains("ERROR") {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(ParseResponse {
        success: true,
        data: Some(mock_expense(&request.text)),
    }))
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
}

#[derive(Debug, Deserialize)]
struct GenerateContent {
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Deserialize)]
struct GeneratePart {
    text: String,
}

/// Generative parse endpoint; replies with a fenced JSON completion the
/// way hosted completion APIs tend to
async fn handle_generate(Json(request): Json<GenerateRequest>) -> Json<Value> {
    let prompt: String = request
        .contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .map(|p| p.text.as_str())
        .collect();
    maybe_stall(&prompt).await;

    let completion = format!("```json\n{}\n```", mock_expense(&prompt));

    Json(json!({
        "candidates": [{
            "content": {
                "parts": [{"text": completion}]
            }
        }]
    }))
}

/// Hold the handler past any reasonable client deadline
async fn maybe_stall(text: &str) {
    if text.contains("SLOW") {
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    }
}

/// Keyword-based canned parse, predictable for tests
fn mock_expense(text: &str) -> Value {
    let lower = text.to_lowercase();

    let amount = Regex::new(r"(?:₹|Rs\.?|INR)\s*([\d,]+\.?\d{0,2})")
        .expect("valid regex")
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0);

    let merchant = if lower.contains("swiggy") {
        "Swiggy"
    } else if lower.contains("zomato") {
        "Zomato"
    } else if lower.contains("amazon") {
        "Amazon"
    } else {
        "Unknown Merchant"
    };

    let direction = if lower.contains("received") || lower.contains("refund") {
        "credit"
    } else {
        "debit"
    };

    json!({
        "amount": amount,
        "merchant": merchant,
        "type": direction,
        "confidence": 90
    })
}
