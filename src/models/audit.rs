// ABOUTME: One durable audit record per handled request

use crate::models::ToolCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal outcome of a request, recorded exactly once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Completed,
    RateLimited,
    PermissionDenied,
    MaxIterationsReached,
    Error,
}

/// A single durable record of how one request was handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub request_id: Uuid,
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub outcome: AuditOutcome,
    pub iterations: u32,
    pub tool_calls: Vec<ToolCall>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
    pub estimated_cost_usd: f64,
    pub error_tag: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
