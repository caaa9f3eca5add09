// ABOUTME: Parallel tool-call dispatch with per-call permission re-validation
// grounded on the teacher's concurrent provider fallback pattern, generalized
// to fan out over N tool calls via futures::future::join_all

use crate::errors::AppError;
use crate::mcp::McpRegistry;
use crate::models::{McpDescriptor, ToolCall, ToolResult, ToolSchema, User};
use crate::permissions::PermissionResolver;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatch every tool call the LM requested in one iteration concurrently.
///
/// Each call is re-validated against the user's permissions immediately
/// before invocation rather than trusting the Allowed-Tools View the LM was
/// shown, since that view may have gone stale between prompt assembly and
/// the LM's response.
pub async fn dispatch_all(
    registry: &McpRegistry,
    user: &User,
    mcps_by_id: &HashMap<String, (Arc<McpDescriptor>, ToolSchema)>,
    calls: Vec<ToolCall>,
) -> Vec<ToolResult> {
    let futures = calls.into_iter().map(|call| async move {
        let Some((mcp, schema)) = mcps_by_id.get(&call.qualified_name) else {
            return ToolResult::not_permitted(&call.id, &call.qualified_name, AppError::not_found("tool").message);
        };

        let decision = PermissionResolver::evaluate(user, Some(mcp), Some(schema));
        if !decision.allowed {
            return ToolResult::not_permitted(
                &call.id,
                &call.qualified_name,
                format!("permission denied: {}", decision.reason.as_str()),
            );
        }

        match registry.call_tool(&mcp.id, &schema.name, call.arguments.clone()).await {
            Ok(output) => ToolResult::ok(&call.id, &call.qualified_name, output),
            Err(err) => ToolResult::err(&call.id, &call.qualified_name, err.message),
        }
    });

    join_all(futures).await
}
