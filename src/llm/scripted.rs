// ABOUTME: A scripted LmProvider test double, one response per call in order
// exposed behind the `testing` feature for integration tests exercising the agentic loop

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatRequest, ChatResponse, LmProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns a pre-scripted sequence of responses, one per call, in order.
/// Panics in test code are acceptable; `complete` returns an error instead
/// so callers can exercise the "LM adapter failed" path without a panic.
pub struct ScriptedLmProvider {
    responses: Mutex<Vec<ChatResponse>>,
}

impl ScriptedLmProvider {
    #[must_use]
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl LmProvider for ScriptedLmProvider {
    async fn complete(&self, _request: ChatRequest) -> AppResult<ChatResponse> {
        let mut responses = self.responses.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if responses.is_empty() {
            return Err(AppError::lm("ScriptedLmProvider ran out of scripted responses"));
        }
        Ok(responses.remove(0))
    }
}
