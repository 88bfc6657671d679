pub mod fsm;

pub use fsm::{RetryEvent, RetryState, RetryStateMachine};

use crate::{
    Error, Result,
    config::RetryConfig,
    upstream::{Classification, InferenceClient, UpstreamOutcome, classify},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

pub const TEXT_REQUIRED: &str = "Text is required";

/// Fixed-delay retry settings. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.retry_delay())
    }
}

/// Forwards text to the inference endpoint, retrying while the model loads.
#[derive(Clone)]
pub struct SentimentProxy {
    client: Arc<dyn InferenceClient>,
    policy: RetryPolicy,
}

impl SentimentProxy {
    pub fn new(client: Arc<dyn InferenceClient>, policy: RetryPolicy) -> Result<Self> {
        if policy.max_retries == 0 {
            return Err(Error::config("retry policy needs at least one attempt"));
        }

        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Returns the upstream classification payload unchanged.
    pub async fn analyze(&self, text: &str) -> Result<Value> {
        if text.is_empty() {
            return Err(Error::invalid_request(TEXT_REQUIRED));
        }

        let mut fsm = RetryStateMachine::new(self.policy.max_retries)?;

        loop {
            if fsm.current_state() == RetryState::WaitingToRetry {
                info!(
                    "Retrying in {} ms...",
                    self.policy.retry_delay.as_millis()
                );
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            fsm.transition(RetryEvent::Dispatch)?;
            info!(
                "Attempt {}/{} to call upstream",
                fsm.attempt(),
                fsm.max_attempts()
            );

            let outcome = match self.client.infer(text).await {
                Ok(response) => classify(&response.body),
                Err(err) => UpstreamOutcome::from(err),
            };

            if let UpstreamOutcome::Success(payload) = outcome {
                fsm.transition(RetryEvent::Completed)?;
                info!("Success on attempt {}", fsm.attempt());
                return Ok(payload);
            }

            if outcome.is_retryable() {
                warn!("Attempt {} not ready: {:?}", fsm.attempt(), outcome);
                if fsm.transition(RetryEvent::Retryable)? == RetryState::Exhausted {
                    error!("Upstream unavailable after {} attempts", fsm.attempt());
                    return Err(Error::Exhausted {
                        attempts: fsm.attempt(),
                    });
                }
                continue;
            }

            fsm.transition(RetryEvent::Fatal)?;
            error!("Attempt {} failed permanently: {:?}", fsm.attempt(), outcome);
            return Err(outcome
                .into_error()
                .unwrap_or_else(|| Error::internal("unclassified upstream outcome")));
        }
    }

    /// Like [`analyze`](Self::analyze), decoded into label scores.
    pub async fn classify(&self, text: &str) -> Result<Classification> {
        let payload = self.analyze(text).await?;
        serde_json::from_value(payload)
            .map_err(|_| Error::upstream_fatal("unexpected data format"))
    }
}
