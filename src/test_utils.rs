// ABOUTME: Fixture builders shared by unit and integration tests
// grounded on the teacher's `test_utils.rs` (`create_test_user`/`create_test_admin_user`)

use crate::models::{HealthState, HealthStatus, McpDescriptor, Role, ToolPolicy, ToolSchema, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// A role granting only `postgres`, with a small rate limit — useful for
/// exercising the rate limiter without special-casing "unlimited".
#[must_use]
pub fn test_member_role() -> Role {
    let mut mcp_access = HashMap::new();
    mcp_access.insert("postgres".to_owned(), true);
    Role {
        name: "member".to_owned(),
        mcp_access,
        rate_limit_per_window: Some(5),
    }
}

/// An admin role with unlimited rate limit and access to every test MCP.
#[must_use]
pub fn test_admin_role() -> Role {
    let mut mcp_access = HashMap::new();
    mcp_access.insert("postgres".to_owned(), true);
    mcp_access.insert("github".to_owned(), true);
    Role {
        name: "admin".to_owned(),
        mcp_access,
        rate_limit_per_window: None,
    }
}

#[must_use]
pub fn test_user(id: &str, role: Role) -> User {
    User::new(id, role)
}

#[must_use]
pub fn test_mcp(id: &str, enabled: bool) -> McpDescriptor {
    McpDescriptor {
        id: id.to_owned(),
        base_url: format!("http://localhost/{id}"),
        enabled,
        tool_policy: ToolPolicy::AllowAll,
    }
}

#[must_use]
pub fn test_tool(mcp_id: &str, name: &str) -> ToolSchema {
    ToolSchema {
        mcp_id: mcp_id.to_owned(),
        name: name.to_owned(),
        description: format!("test tool {name}"),
        input_schema: serde_json::json!({"type": "object", "properties": {}}),
    }
}

#[must_use]
pub fn healthy_state() -> HealthState {
    HealthState {
        status: HealthStatus::Healthy,
        last_transition: Utc::now(),
        consecutive_failures: 0,
    }
}

#[must_use]
pub fn test_mcp_snapshot(
    mcp_id: &str,
    enabled: bool,
    tools: &[&str],
) -> (Arc<McpDescriptor>, HealthState, Vec<ToolSchema>) {
    (
        Arc::new(test_mcp(mcp_id, enabled)),
        healthy_state(),
        tools.iter().map(|t| test_tool(mcp_id, t)).collect(),
    )
}
