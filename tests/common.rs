// ABOUTME: Shared fixtures for the bridge's integration tests

use async_trait::async_trait;
use mcp_bridge_server::errors::AppResult;
use mcp_bridge_server::mcp::McpTransport;
use mcp_bridge_server::models::ToolSchema;
use serde_json::Value;
use std::sync::Arc;

/// A transport that always lists one tool and echoes its arguments back as
/// the call result.
pub struct FakeTransport {
    pub mcp_id: String,
    pub tool_name: String,
}

#[async_trait]
impl McpTransport for FakeTransport {
    async fn list_tools(&self) -> AppResult<Vec<ToolSchema>> {
        Ok(vec![ToolSchema {
            mcp_id: self.mcp_id.clone(),
            name: self.tool_name.clone(),
            description: "fake tool".to_owned(),
            input_schema: serde_json::json!({}),
        }])
    }

    async fn call_tool(&self, _tool_name: &str, arguments: Value) -> AppResult<Value> {
        Ok(serde_json::json!({ "echo": arguments }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[must_use]
pub fn fake_transport(mcp_id: &str, tool_name: &str) -> Arc<dyn McpTransport> {
    Arc::new(FakeTransport {
        mcp_id: mcp_id.to_owned(),
        tool_name: tool_name.to_owned(),
    })
}
