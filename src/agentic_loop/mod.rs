// ABOUTME: Drives one request through LM iterations and tool dispatch
// until a final answer, the iteration ceiling, or the request deadline

mod dispatch;

use crate::config::AgenticLoopConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatCompletion, ChatMessage, ChatRequest, LmProvider, TokenUsage};
use crate::mcp::McpRegistry;
use crate::models::{HealthState, McpDescriptor, ThreadMessage, ThreadRole, ToolCall, ToolResult, ToolSchema, User};
use crate::permissions::AllowedToolsView;
use std::collections::HashMap;
use std::sync::Arc;

/// How the loop ended.
#[derive(Debug, Clone)]
pub enum LoopOutcome {
    Answered { answer: String },
    MaxIterationsReached { best_effort_answer: String },
}

/// Everything the caller needs to build the audit record and response.
#[derive(Debug, Clone)]
pub struct LoopResult {
    pub outcome: LoopOutcome,
    pub iterations: u32,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}

/// Drives the agentic loop: assembles the cacheable system block and tool
/// catalog, calls the LM, dispatches any requested tool calls in parallel,
/// and repeats until the LM returns a final answer or `max_iterations` is
/// reached.
pub struct AgenticLoop {
    config: AgenticLoopConfig,
    lm: Arc<dyn LmProvider>,
}

impl AgenticLoop {
    #[must_use]
    pub fn new(config: AgenticLoopConfig, lm: Arc<dyn LmProvider>) -> Self {
        Self { config, lm }
    }

    /// Run one request to completion (or to its terminal condition),
    /// bounded overall by `config.request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::timeout` if the deadline elapses, or propagates
    /// the first LM/tool-transport error the loop cannot recover from.
    pub async fn run(
        &self,
        registry: &McpRegistry,
        user: &User,
        allowed_view: &AllowedToolsView,
        mcps: &[(Arc<McpDescriptor>, HealthState, Vec<ToolSchema>)],
        thread_history: &[ThreadMessage],
        message: &str,
    ) -> AppResult<LoopResult> {
        tokio::time::timeout(
            self.config.request_timeout,
            self.run_inner(registry, user, allowed_view, mcps, thread_history, message),
        )
        .await
        .map_err(|_| AppError::timeout("agentic loop exceeded its request deadline"))?
    }

    async fn run_inner(
        &self,
        registry: &McpRegistry,
        user: &User,
        allowed_view: &AllowedToolsView,
        mcps: &[(Arc<McpDescriptor>, HealthState, Vec<ToolSchema>)],
        thread_history: &[ThreadMessage],
        message: &str,
    ) -> AppResult<LoopResult> {
        let (catalog, index) = build_catalog(allowed_view, mcps);

        let mut messages = vec![ChatMessage::system(system_prompt(user), true)];
        for past in thread_history {
            messages.push(match past.role {
                ThreadRole::User => ChatMessage::user(past.content.clone()),
                ThreadRole::Assistant => ChatMessage::assistant(past.content.clone()),
            });
        }
        messages.push(ChatMessage::user(message.to_owned()));

        let mut usage = TokenUsage::default();
        let mut all_tool_calls = Vec::new();
        let mut iterations = 0u32;

        loop {
            iterations += 1;
            let request = ChatRequest {
                messages: messages.clone(),
                tools: catalog.clone(),
            };

            let response = self.lm.complete(request).await?;
            usage.input_tokens += response.usage.input_tokens;
            usage.output_tokens += response.usage.output_tokens;
            usage.cached_tokens += response.usage.cached_tokens;

            match response.completion {
                ChatCompletion::Answer(answer) => {
                    return Ok(LoopResult {
                        outcome: LoopOutcome::Answered { answer },
                        iterations,
                        tool_calls: all_tool_calls,
                        usage,
                    });
                }
                ChatCompletion::ToolCalls(calls) => {
                    if iterations >= self.config.max_iterations {
                        let best_effort = summarize_tool_calls(&calls);
                        return Ok(LoopResult {
                            outcome: LoopOutcome::MaxIterationsReached {
                                best_effort_answer: best_effort,
                            },
                            iterations,
                            tool_calls: all_tool_calls,
                            usage,
                        });
                    }

                    let results = dispatch::dispatch_all(registry, user, &index, calls.clone()).await;
                    let permitted_ids: std::collections::HashSet<&str> =
                        results.iter().filter(|r| r.permitted).map(|r| r.call_id.as_str()).collect();
                    all_tool_calls.extend(calls.iter().filter(|c| permitted_ids.contains(c.id.as_str())).cloned());
                    messages.push(ChatMessage::assistant(render_tool_calls(&calls)));
                    messages.push(ChatMessage::user(render_tool_results(&results)));
                }
            }
        }
    }
}

fn system_prompt(user: &User) -> String {
    format!(
        "You are an assistant acting on behalf of user {} with role {}. Use only the tools offered to you.",
        user.id, user.role.name
    )
}

fn build_catalog(
    allowed_view: &AllowedToolsView,
    mcps: &[(Arc<McpDescriptor>, HealthState, Vec<ToolSchema>)],
) -> (Vec<ToolSchema>, HashMap<String, (Arc<McpDescriptor>, ToolSchema)>) {
    let mut catalog = Vec::new();
    let mut index = HashMap::new();
    for (mcp, _health, schemas) in mcps {
        for schema in schemas {
            let qualified = schema.qualified_name();
            if allowed_view.tools.contains(&qualified) {
                catalog.push(schema.clone());
                index.insert(qualified, (mcp.clone(), schema.clone()));
            }
        }
    }
    (catalog, index)
}

fn render_tool_calls(calls: &[ToolCall]) -> String {
    calls
        .iter()
        .map(|c| format!("call {} -> {}", c.qualified_name, c.arguments))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tool_results(results: &[ToolResult]) -> String {
    results
        .iter()
        .map(|r| format!("result {} success={} -> {}", r.qualified_name, r.success, r.output))
        .collect::<Vec<_>>()
        .join("\n")
}

fn summarize_tool_calls(calls: &[ToolCall]) -> String {
    let names: Vec<&str> = calls.iter().map(|c| c.qualified_name.as_str()).collect();
    format!(
        "The iteration limit was reached before a final answer was produced. Pending tool calls: {}",
        names.join(", ")
    )
}
