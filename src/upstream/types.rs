use serde::{Deserialize, Serialize};

/// Body sent to the inference endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
}

/// One label/score pair of a text-classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Classification payload: one list of label scores per input.
pub type Classification = Vec<Vec<LabelScore>>;

/// Raw upstream reply. The body is kept as text since errors are not always JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
