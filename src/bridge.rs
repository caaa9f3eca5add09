// ABOUTME: Top-level orchestrator tying rate limiting, permissions, the MCP registry,
// the agentic loop, and audit recording together behind one request/response surface

use crate::agentic_loop::{AgenticLoop, LoopOutcome};
use crate::audit::{AuditRecorder, AuditSink};
use crate::config::BridgeConfig;
use crate::errors::{AppError, AppResult};
use crate::llm::LmProvider;
use crate::mcp::McpRegistry;
use crate::models::{AuditOutcome, AuditRecord, ThreadMessage, ThreadRole, User};
use crate::permissions::PermissionResolver;
use crate::rate_limiting::RateLimiter;
use crate::request::{BridgeRequest, BridgeResponse};
use crate::thread_store::ThreadStore;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Wires every bridge component together behind `handle_request`. Construct
/// once per process; every field is internally shareable so `Bridge` itself
/// can be held behind an `Arc` and called concurrently.
pub struct Bridge {
    config: BridgeConfig,
    registry: Arc<McpRegistry>,
    permissions: PermissionResolver,
    rate_limiter: RateLimiter,
    thread_store: ThreadStore,
    agentic_loop: AgenticLoop,
    audit_recorder: AuditRecorder,
    audit_sink: Arc<dyn AuditSink>,
}

impl Bridge {
    #[must_use]
    pub fn new(
        config: BridgeConfig,
        registry: Arc<McpRegistry>,
        lm: Arc<dyn LmProvider>,
        audit_sink: Arc<dyn AuditSink>,
        audit_channel_capacity: usize,
    ) -> Self {
        let permissions = PermissionResolver::new(config.permissions.clone());
        let rate_limiter = RateLimiter::new(config.rate_limiter.clone());
        let thread_store = ThreadStore::new(config.thread_store.clone());
        let agentic_loop = AgenticLoop::new(config.agentic_loop.clone(), lm);
        let audit_recorder = AuditRecorder::spawn(audit_sink.clone(), audit_channel_capacity);

        Self {
            config,
            registry,
            permissions,
            rate_limiter,
            thread_store,
            agentic_loop,
            audit_recorder,
            audit_sink,
        }
    }

    /// Handle one chat request end to end: rate-limit admission, permission
    /// resolution, the agentic loop, and exactly one audit record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::rate_limited` or a loop/transport error. Every
    /// path through this function, including early returns, writes one
    /// audit record before returning.
    pub async fn handle_request(&self, user: &User, request: BridgeRequest) -> AppResult<BridgeResponse> {
        let request_id = Uuid::new_v4();
        let now = Utc::now();

        let rate_key = format!("{}:{}", user.role.name, user.id);
        let decision = self
            .rate_limiter
            .check_and_record(&rate_key, user.role.rate_limit_per_window, now);
        if !decision.allowed {
            self.record_audit(request_id, user, &request, AuditOutcome::RateLimited, 0, vec![], 0, 0, 0, 0.0, Some("rate_limited"))
                .await;
            return Err(AppError::rate_limited("rate limit exceeded for this role"));
        }

        let mcps = self.registry.snapshot().await;
        let view = self.permissions.resolve(user, &mcps, now);

        if view.tools.is_empty() {
            self.record_audit(
                request_id,
                user,
                &request,
                AuditOutcome::PermissionDenied,
                0,
                vec![],
                0,
                0,
                0,
                0.0,
                Some("permission_denied"),
            )
            .await;
            return Err(AppError::permission_denied(
                "no tools are available to this user given current role/overrides/MCP health",
            ));
        }

        let history = match &request.conversation_id {
            Some(conversation_id) => self
                .thread_store
                .recent(conversation_id, self.config.agentic_loop.thread_context_messages),
            None => vec![],
        };

        let loop_result = match self
            .agentic_loop
            .run(&self.registry, user, &view, &mcps, &history, &request.message)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                self.record_audit(request_id, user, &request, AuditOutcome::Error, 0, vec![], 0, 0, 0, 0.0, Some(err.code.tag()))
                    .await;
                return Err(err);
            }
        };

        let (answer, outcome) = match loop_result.outcome {
            LoopOutcome::Answered { answer } => (answer, AuditOutcome::Completed),
            LoopOutcome::MaxIterationsReached { best_effort_answer } => {
                (best_effort_answer, AuditOutcome::MaxIterationsReached)
            }
        };

        if let Some(conversation_id) = &request.conversation_id {
            self.thread_store.append(
                conversation_id,
                ThreadMessage {
                    role: ThreadRole::User,
                    content: request.message.clone(),
                    created_at: now,
                },
                self.config.agentic_loop.thread_context_messages,
                now,
            );
            self.thread_store.append(
                conversation_id,
                ThreadMessage {
                    role: ThreadRole::Assistant,
                    content: answer.clone(),
                    created_at: now,
                },
                self.config.agentic_loop.thread_context_messages,
                now,
            );
        }

        let error_tag = match outcome {
            AuditOutcome::MaxIterationsReached => Some("max_iterations_reached"),
            _ => None,
        };
        self.record_audit(
            request_id,
            user,
            &request,
            outcome,
            loop_result.iterations,
            loop_result.tool_calls.clone(),
            loop_result.usage.input_tokens,
            loop_result.usage.output_tokens,
            loop_result.usage.cached_tokens,
            loop_result.usage.estimated_cost_usd(),
            error_tag,
        )
        .await;

        Ok(BridgeResponse {
            answer,
            outcome,
            iterations: loop_result.iterations,
            tool_calls: loop_result.tool_calls,
            input_tokens: loop_result.usage.input_tokens,
            output_tokens: loop_result.usage.output_tokens,
            cached_tokens: loop_result.usage.cached_tokens,
            estimated_cost_usd: loop_result.usage.estimated_cost_usd(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn record_audit(
        &self,
        request_id: Uuid,
        user: &User,
        request: &BridgeRequest,
        outcome: AuditOutcome,
        iterations: u32,
        tool_calls: Vec<crate::models::ToolCall>,
        input_tokens: u64,
        output_tokens: u64,
        cached_tokens: u64,
        estimated_cost_usd: f64,
        error_tag: Option<&str>,
    ) {
        let record = AuditRecord {
            request_id,
            user_id: user.id.clone(),
            conversation_id: request.conversation_id.clone(),
            outcome,
            iterations,
            tool_calls,
            input_tokens,
            output_tokens,
            cached_tokens,
            estimated_cost_usd,
            error_tag: error_tag.map(ToOwned::to_owned),
            recorded_at: Utc::now(),
        };
        self.audit_recorder.submit(record, self.audit_sink.as_ref()).await;
    }
}
