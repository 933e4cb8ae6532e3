//! Pipeline orchestrator
//!
//! Sequences normalization, currency enhancement, the remote parse
//! attempt, and fallback to the local heuristic extractor. One
//! `RawObservation` in, one `ExpenseRecord` out (or `Error::NoText` for an
//! empty observation). Remote failures are absorbed here and never reach
//! the caller; the local tier has no error path at all.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::enhance::enhance;
use crate::error::{Error, Result};
use crate::extract::{ExtractorConfig, HeuristicExtractor};
use crate::models::{ExpenseRecord, RawObservation, UNKNOWN_MERCHANT};
use crate::normalize::{normalize, reading_order};
use crate::remote::{ParseBackend, ParserClient, RemoteExpense};

/// Orchestrator policy knobs
///
/// Endpoint and timeout live on the configured `ParserClient`; there is no
/// global state anywhere in the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Re-run the local extractor when the remote tier answers with a zero
    /// amount. Observed deployments disagree on this; default is to pass
    /// the zero through with a warning.
    pub fallback_on_zero_amount: bool,
}

/// Confidence recorded for a remote parse that carried no score of its own
const REMOTE_DEFAULT_CONFIDENCE: u8 = 80;

/// Text-to-expense pipeline
///
/// Remote and local extraction are alternative strategies behind one
/// interface, mutually exclusive per observation - partial results are
/// never merged across the two.
#[derive(Clone)]
pub struct ExpensePipeline {
    parser: Option<ParserClient>,
    extractor: HeuristicExtractor,
    config: PipelineConfig,
}

impl ExpensePipeline {
    /// Pipeline with a remote parse tier and local fallback
    pub fn new(parser: ParserClient) -> Self {
        Self {
            parser: Some(parser),
            extractor: HeuristicExtractor::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Offline pipeline: local heuristic extraction only
    pub fn local_only() -> Self {
        Self {
            parser: None,
            extractor: HeuristicExtractor::new(),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_extractor_config(mut self, config: ExtractorConfig) -> Self {
        self.extractor = HeuristicExtractor::with_config(config);
        self
    }

    /// Process one observation into one expense record
    ///
    /// Never fails for ordinary extraction ambiguity - only for an empty
    /// observation. A zero-amount record with low confidence signals
    /// "needs manual entry" to the confirmation step downstream.
    pub async fn process(&self, observation: &RawObservation) -> Result<ExpenseRecord> {
        if observation.is_empty() {
            return Err(Error::NoText);
        }

        let source = if observation.blocks.is_empty() {
            observation.text.clone()
        } else {
            let ordered = reading_order(&observation.blocks);
            if ordered.is_empty() {
                observation.text.clone()
            } else {
                ordered
            }
        };

        let enhanced = enhance(&normalize(&source));
        debug!(text = %enhanced, "normalized and enhanced observation");

        let record = match &self.parser {
            Some(parser) => match parser.parse_expense(&enhanced).await {
                Ok(remote) if remote.amount <= 0.0 && self.config.fallback_on_zero_amount => {
                    info!("remote parse returned zero amount, re-running local extractor");
                    self.extract_local(&enhanced)
                }
                Ok(remote) => self.from_remote(remote),
                Err(e) => {
                    warn!(
                        endpoint = parser.endpoint(),
                        error = %e,
                        "remote parse failed, falling back to local extractor"
                    );
                    self.extract_local(&enhanced)
                }
            },
            None => self.extract_local(&enhanced),
        };

        Ok(ExpenseRecord {
            raw_text: observation.text.clone(),
            timestamp: Utc::now(),
            ..record
        })
    }

    /// Build a record from the remote tier's answer
    fn from_remote(&self, remote: RemoteExpense) -> ExpenseRecord {
        let amount = if remote.amount < 0.0 {
            warn!(amount = remote.amount, "remote parse returned negative amount, clamping");
            0.0
        } else {
            remote.amount
        };
        let merchant = if remote.merchant.trim().is_empty() {
            UNKNOWN_MERCHANT.to_string()
        } else {
            remote.merchant
        };

        ExpenseRecord {
            amount,
            merchant,
            direction: remote.direction,
            // Category is only ever attached by the confirmation step;
            // anything the remote model guessed is discarded
            category: None,
            confidence: remote.confidence.unwrap_or(REMOTE_DEFAULT_CONFIDENCE),
            raw_text: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Deterministic local extraction; every branch has a default
    fn extract_local(&self, text: &str) -> ExpenseRecord {
        let (amount, confidence) = match self.extractor.extract_amount_tiered(text) {
            Some((value, tier)) => {
                info!(amount = value, tier = tier.as_str(), "local extractor matched");
                (value, tier.confidence())
            }
            None => (0.0, 0),
        };

        ExpenseRecord {
            amount,
            merchant: self.extractor.extract_merchant(text),
            direction: self.extractor.classify_direction(text),
            category: None,
            confidence,
            raw_text: String::new(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::remote::MockBackend;

    #[tokio::test]
    async fn test_empty_observation_is_named_failure() {
        let pipeline = ExpensePipeline::local_only();
        let result = pipeline.process(&RawObservation::from_text("   \n ")).await;
        assert!(matches!(result, Err(Error::NoText)));
    }

    #[tokio::test]
    async fn test_local_only_extraction() {
        let pipeline = ExpensePipeline::local_only();
        let record = pipeline
            .process(&RawObservation::from_text("Paid to Swiggy\nRs.350.00"))
            .await
            .unwrap();
        assert_eq!(record.amount, 350.0);
        assert_eq!(record.merchant, "Swiggy");
        assert_eq!(record.direction, Direction::Debit);
        assert_eq!(record.confidence, 95);
        assert_eq!(record.raw_text, "Paid to Swiggy\nRs.350.00");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        let pipeline = ExpensePipeline::new(ParserClient::Mock(MockBackend::failing()));
        let record = pipeline
            .process(&RawObservation::from_text("Paid to Zomato\n₹240"))
            .await
            .unwrap();
        // Local fallback, not an error
        assert_eq!(record.amount, 240.0);
        assert_eq!(record.merchant, "Zomato");
    }

    #[tokio::test]
    async fn test_remote_result_wins_over_local() {
        let remote = RemoteExpense {
            amount: 999.0,
            merchant: "Remote Cafe".to_string(),
            direction: Direction::Credit,
            category: Some("food".to_string()),
            confidence: Some(91),
        };
        let pipeline = ExpensePipeline::new(ParserClient::Mock(MockBackend::with_response(remote)));
        let record = pipeline
            .process(&RawObservation::from_text("₹240 paid"))
            .await
            .unwrap();
        assert_eq!(record.amount, 999.0);
        assert_eq!(record.merchant, "Remote Cafe");
        assert_eq!(record.direction, Direction::Credit);
        assert_eq!(record.confidence, 91);
        // Remote category guesses never pass through
        assert_eq!(record.category, None);
    }

    #[tokio::test]
    async fn test_zero_amount_passes_through_by_default() {
        let remote = RemoteExpense {
            amount: 0.0,
            merchant: "Payment".to_string(),
            direction: Direction::Debit,
            category: None,
            confidence: Some(20),
        };
        let pipeline = ExpensePipeline::new(ParserClient::Mock(MockBackend::with_response(remote)));
        let record = pipeline
            .process(&RawObservation::from_text("₹240 paid"))
            .await
            .unwrap();
        assert_eq!(record.amount, 0.0);
        assert!(record.needs_manual_entry());
    }

    #[tokio::test]
    async fn test_zero_amount_policy_can_fall_back() {
        let remote = RemoteExpense {
            amount: 0.0,
            merchant: "Payment".to_string(),
            direction: Direction::Debit,
            category: None,
            confidence: Some(20),
        };
        let pipeline = ExpensePipeline::new(ParserClient::Mock(MockBackend::with_response(remote)))
            .with_config(PipelineConfig {
                fallback_on_zero_amount: true,
            });
        let record = pipeline
            .process(&RawObservation::from_text("₹240 paid"))
            .await
            .unwrap();
        assert_eq!(record.amount, 240.0);
    }

    #[tokio::test]
    async fn test_reading_order_applied_before_extraction() {
        use crate::models::{BoundingBox, TextBlock};
        let bbox = |x, y| {
            Some(BoundingBox {
                x,
                y,
                width: 100,
                height: 30,
            })
        };
        // Blocks arrive out of order; "To" must land directly above the name
        let blocks = vec![
            TextBlock::new("NISHA SHARMA", bbox(10, 120)),
            TextBlock::new("To", bbox(10, 40)),
            TextBlock::new("₹245", bbox(10, 260)),
        ];
        let pipeline = ExpensePipeline::local_only();
        let record = pipeline
            .process(&RawObservation::with_blocks("unordered", blocks))
            .await
            .unwrap();
        assert_eq!(record.merchant, "NISHA SHARMA");
        assert_eq!(record.amount, 245.0);
    }

    #[tokio::test]
    async fn test_remote_empty_merchant_defaults() {
        let remote = RemoteExpense {
            amount: 50.0,
            merchant: "  ".to_string(),
            direction: Direction::Debit,
            category: None,
            confidence: None,
        };
        let pipeline = ExpensePipeline::new(ParserClient::Mock(MockBackend::with_response(remote)));
        let record = pipeline
            .process(&RawObservation::from_text("some payment text"))
            .await
            .unwrap();
        assert_eq!(record.merchant, UNKNOWN_MERCHANT);
        assert_eq!(record.confidence, REMOTE_DEFAULT_CONFIDENCE);
    }
}
