//! Deterministic chat model for tests and offline runs.

use super::{ChatModel, ChatReply, ChatRequest};
use crate::error::{CodemapError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&ChatRequest) -> Result<ChatReply> + Send + Sync>;

/// A chat model whose replies are computed locally.
///
/// Every request is recorded so callers can inspect exactly what an agent
/// sent to the model.
pub struct ScriptedModel {
    model_id: String,
    responder: Responder,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    /// Create a model that answers each request with `responder`.
    pub fn new<F>(model_id: &str, responder: F) -> Self
    where
        F: Fn(&ChatRequest) -> Result<ChatReply> + Send + Sync + 'static,
    {
        Self {
            model_id: model_id.to_string(),
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a model that always answers with the same text.
    pub fn fixed(model_id: &str, content: &str) -> Self {
        let content = content.to_string();
        Self::new(model_id, move |_| Ok(ChatReply::text(content.clone())))
    }

    /// Create a model that replays `replies` in order and fails once they run out.
    pub fn sequence(model_id: &str, replies: Vec<ChatReply>) -> Self {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(model_id, move |_| {
            queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .ok_or_else(|| CodemapError::OpenAI("Scripted replies exhausted".to_string()))
        })
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let reply = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        reply
    }
}
