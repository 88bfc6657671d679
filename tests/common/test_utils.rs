use axum::{
    body::{Body, to_bytes},
    http::{Request, Response},
};
use sentiment_proxy::{
    proxy::{RetryPolicy, SentimentProxy},
    upstream::{InferenceClient, RawResponse},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

pub const ENDPOINT: &str = "/api/analyze";

pub const LOADING_BODY: &str =
    r#"{"error":"Model distilbert-base-uncased-finetuned-sst-2-english is currently loading","estimated_time":20.0}"#;

pub const POSITIVE_BODY: &str =
    r#"[[{"label":"POSITIVE","score":0.9998},{"label":"NEGATIVE","score":0.0002}]]"#;

pub fn loading() -> Result<RawResponse, sentiment_proxy::upstream::TransportError> {
    Ok(RawResponse::new(503, LOADING_BODY))
}

pub fn positive() -> Result<RawResponse, sentiment_proxy::upstream::TransportError> {
    Ok(RawResponse::new(200, POSITIVE_BODY))
}

/// Retry policy with the production attempt count and a near-zero delay
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(10, Duration::from_millis(1))
}

pub fn create_proxy(client: Arc<dyn InferenceClient>, policy: RetryPolicy) -> SentimentProxy {
    SentimentProxy::new(client, policy).expect("valid retry policy")
}

pub fn analyze_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(ENDPOINT)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
