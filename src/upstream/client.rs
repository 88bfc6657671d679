use super::types::{InferenceRequest, RawResponse};
use crate::{Result, config::UpstreamConfig};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;
use tracing::debug;

/// Failure to obtain a response body at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Performs a single inference call and returns the status and raw body.
    async fn infer(&self, text: &str) -> std::result::Result<RawResponse, TransportError>;
}

pub struct HuggingFaceClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.model_url(),
            api_key: config.api_key,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn infer(&self, text: &str) -> std::result::Result<RawResponse, TransportError> {
        debug!("Sending {} characters to {}", text.chars().count(), self.url);

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&InferenceRequest { inputs: text })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Raw response from upstream ({}): {}", status, body);

        Ok(RawResponse { status, body })
    }
}
