// ABOUTME: Inbound request and outbound response shapes for the bridge's one entry point

use crate::models::{AuditOutcome, ToolCall};
use serde::{Deserialize, Serialize};

/// A chat turn submitted by a user. `conversation_id` is optional: when a
/// client omits it, the turn carries no thread context and no thread
/// history is read or appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub message: String,
}

/// The bridge's synthesized answer plus the accounting the audit record
/// will also carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub answer: String,
    pub outcome: AuditOutcome,
    pub iterations: u32,
    pub tool_calls: Vec<ToolCall>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
    pub estimated_cost_usd: f64,
}
