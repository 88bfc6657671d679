use async_trait::async_trait;
use sentiment_proxy::upstream::{InferenceClient, RawResponse, TransportError};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

pub type Reply = std::result::Result<RawResponse, TransportError>;

/// Inference client that replays a fixed script of replies
#[derive(Debug, Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues replies, served in order.
    pub fn with_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.script.lock().unwrap().extend(replies);
        self
    }

    pub fn with_body(self, body: &str) -> Self {
        self.with_replies([Ok(RawResponse::new(200, body))])
    }

    /// Reply served once the script runs out.
    pub fn repeating(mut self, reply: Reply) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn infer(&self, text: &str) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), Instant::now()));

        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply;
        }

        self.fallback
            .clone()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}
