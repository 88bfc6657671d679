mod classify;
mod client;
mod types;

pub use classify::{UpstreamOutcome, classify};
pub use client::{HuggingFaceClient, InferenceClient, TransportError};
pub use types::{Classification, InferenceRequest, LabelScore, RawResponse};
