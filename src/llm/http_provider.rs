// ABOUTME: Generic HTTP LM provider speaking an OpenAI-compatible tool-call envelope
// grounded on the teacher's `ChatProvider::from_env` / `OpenAiCompatibleProvider`

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatCompletion, ChatMessage, ChatRequest, ChatResponse, LmProvider, MessageRole, TokenUsage};
use crate::models::ToolCall;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Talks to any OpenAI-compatible chat-completions endpoint. The exact
/// vendor wire format beyond that convention is intentionally not modeled
/// here; a vendor-specific adapter would implement `LmProvider` directly.
pub struct HttpLmProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl HttpLmProvider {
    /// Build from environment variables `BRIDGE_LM_ENDPOINT`, `BRIDGE_LM_API_KEY`,
    /// and `BRIDGE_LM_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::config` if any of the three variables are unset.
    pub fn from_env(timeout: Duration) -> AppResult<Self> {
        let endpoint = std::env::var("BRIDGE_LM_ENDPOINT")
            .map_err(|_| AppError::config("BRIDGE_LM_ENDPOINT is not set"))?;
        let api_key = std::env::var("BRIDGE_LM_API_KEY")
            .map_err(|_| AppError::config("BRIDGE_LM_API_KEY is not set"))?;
        let model = std::env::var("BRIDGE_LM_MODEL")
            .map_err(|_| AppError::config("BRIDGE_LM_MODEL is not set"))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    fn role_str(role: MessageRole) -> &'static str {
        match role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m: &ChatMessage| {
                json!({
                    "role": Self::role_str(m.role),
                    "content": m.content,
                })
            })
            .collect();

        let tools: Vec<Value> = request
            .tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.qualified_name(),
                        "description": t.description,
                        "parameters": t.input_schema,
                    }
                })
            })
            .collect();

        json!({
            "model": self.model,
            "messages": messages,
            "tools": tools,
        })
    }
}

#[async_trait]
impl LmProvider for HttpLmProvider {
    async fn complete(&self, request: ChatRequest) -> AppResult<ChatResponse> {
        let body = self.build_body(&request);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::lm(format!("LM endpoint returned {}", response.status())));
        }

        let payload: CompletionPayload = response.json().await?;
        let usage = TokenUsage {
            input_tokens: payload.usage.prompt_tokens,
            output_tokens: payload.usage.completion_tokens,
            cached_tokens: payload.usage.cached_tokens.unwrap_or(0),
        };

        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::lm("LM response contained no choices"))?;

        let completion = if let Some(tool_calls) = choice.message.tool_calls {
            ChatCompletion::ToolCalls(
                tool_calls
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        qualified_name: tc.function.name,
                        arguments: serde_json::from_str(&tc.function.arguments).unwrap_or(Value::Null),
                    })
                    .collect(),
            )
        } else {
            ChatCompletion::Answer(choice.message.content.unwrap_or_default())
        };

        Ok(ChatResponse { completion, usage })
    }
}

#[derive(serde::Deserialize)]
struct CompletionPayload {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(serde::Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<RawToolCall>>,
}

#[derive(serde::Deserialize)]
struct RawToolCall {
    id: String,
    function: RawFunctionCall,
}

#[derive(serde::Deserialize)]
struct RawFunctionCall {
    name: String,
    arguments: String,
}

#[derive(serde::Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
    #[serde(default)]
    cached_tokens: Option<u64>,
}
