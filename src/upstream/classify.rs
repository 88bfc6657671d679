//! Classification of inference endpoint replies.
//!
//! The hosted inference API does not document its error formats. The patterns
//! below match what it has been observed to return: JSON `{"error": "..."}`
//! objects (with "loading" while a model instance cold-starts) and plain-text
//! bodies such as "Not Found" for unknown models. Anything else that is not a
//! list of label-score lists is rejected.

use super::client::TransportError;
use crate::Error;
use serde_json::Value;

const LOADING_MARKER: &str = "loading";
const NOT_FOUND_MARKER: &str = "Not Found";
const UNEXPECTED_RESPONSE_MARKER: &str = "Unexpected response";

#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    /// A list of lists, relayed to the caller as-is.
    Success(Value),
    /// The model is cold-starting.
    Loading(String),
    /// The call never produced a body. Fatal markers in the message are classified first.
    Transport(String),
    /// Plain-text body mentioning "Not Found".
    ModelNotFound,
    /// Any other body that is not JSON.
    UnexpectedResponse(String),
    /// JSON `error` that is not a loading notice.
    UpstreamError(String),
    /// Valid JSON of the wrong shape.
    UnexpectedShape,
}

/// Classifies a raw response body. The HTTP status is deliberately not consulted.
pub fn classify(body: &str) -> UpstreamOutcome {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) if body.contains(NOT_FOUND_MARKER) => return UpstreamOutcome::ModelNotFound,
        Err(_) => return UpstreamOutcome::UnexpectedResponse(body.to_string()),
    };

    if let Some(error) = error_field(&data) {
        return match error {
            Value::String(message) if message.contains(LOADING_MARKER) => {
                UpstreamOutcome::Loading(message.clone())
            }
            Value::String(message) => UpstreamOutcome::UpstreamError(message.clone()),
            other => UpstreamOutcome::UpstreamError(other.to_string()),
        };
    }

    let well_formed = data
        .as_array()
        .and_then(|outer| outer.first())
        .is_some_and(Value::is_array);

    if well_formed {
        UpstreamOutcome::Success(data)
    } else {
        UpstreamOutcome::UnexpectedShape
    }
}

/// The `error` member of an object, ignoring null, `false` and empty strings.
fn error_field(data: &Value) -> Option<&Value> {
    match data.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

impl From<TransportError> for UpstreamOutcome {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        if message.contains(NOT_FOUND_MARKER) {
            Self::ModelNotFound
        } else if message.contains(UNEXPECTED_RESPONSE_MARKER) {
            Self::UnexpectedResponse(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl UpstreamOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Loading(_) | Self::Transport(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The caller-facing error for a fatal outcome; `None` for success and retryable outcomes.
    pub fn into_error(self) -> Option<Error> {
        let message = match self {
            Self::Success(_) | Self::Loading(_) | Self::Transport(_) => return None,
            Self::ModelNotFound => "model not found".to_string(),
            Self::UnexpectedResponse(_) => "unexpected response format".to_string(),
            Self::UpstreamError(message) => format!("upstream error: {message}"),
            Self::UnexpectedShape => "unexpected data format".to_string(),
        };
        Some(Error::upstream_fatal(message))
    }
}
