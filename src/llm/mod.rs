// ABOUTME: The upstream LM adapter: message/tool-call types, token accounting, provider trait
// grounded on the teacher's `llm::provider` (`ChatProvider`/`LlmProvider`) abstraction

mod http_provider;
#[cfg(any(test, feature = "testing"))]
mod scripted;

pub use http_provider::HttpLmProvider;
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedLmProvider;

use crate::constants::lm_pricing;
use crate::errors::AppResult;
use crate::models::{ToolCall, ToolSchema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in the conversation sent to the LM, including the
/// system-prompt block the agentic loop marks cacheable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Hint to the provider that this message (typically the system block
    /// and tool catalog) is stable across iterations and should be served
    /// from its prompt cache when supported.
    #[serde(default)]
    pub cacheable: bool,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>, cacheable: bool) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            cacheable,
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            cacheable: false,
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            cacheable: false,
        }
    }
}

/// One turn's request to the LM: full message history plus the tool
/// catalog the caller is allowed to offer.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSchema>,
}

/// Token usage reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
}

impl TokenUsage {
    /// Estimated USD cost at the configured per-million-token rates.
    #[must_use]
    pub fn estimated_cost_usd(&self) -> f64 {
        let uncached_input = self.input_tokens.saturating_sub(self.cached_tokens);
        let input_cost = (uncached_input as f64 / 1_000_000.0) * lm_pricing::DEFAULT_INPUT_PRICE_PER_MILLION;
        let cached_cost = (self.cached_tokens as f64 / 1_000_000.0) * lm_pricing::DEFAULT_CACHED_PRICE_PER_MILLION;
        let output_cost = (self.output_tokens as f64 / 1_000_000.0) * lm_pricing::DEFAULT_OUTPUT_PRICE_PER_MILLION;
        input_cost + cached_cost + output_cost
    }
}

/// Either a final textual answer or a batch of tool calls the caller must
/// dispatch and feed back as `ChatMessage::assistant` + tool results.
#[derive(Debug, Clone)]
pub enum ChatCompletion {
    Answer(String),
    ToolCalls(Vec<ToolCall>),
}

/// The provider's response to one `ChatRequest`.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub completion: ChatCompletion,
    pub usage: TokenUsage,
}

/// Abstraction over the upstream language model. Vendor SDK details (exact
/// wire format, streaming) are deliberately out of scope; implementors
/// translate to/from whatever the vendor's API expects.
#[async_trait]
pub trait LmProvider: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> AppResult<ChatResponse>;
}
