// ABOUTME: Tool schema, call, and result types exchanged with MCPs and the LM

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool's schema as advertised by an MCP's `list-tools` call, cached by
/// the registry's schema cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// MCP id this tool belongs to.
    pub mcp_id: String,
    /// Tool name as the MCP knows it (unqualified).
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's input.
    pub input_schema: Value,
}

impl ToolSchema {
    /// The name as it appears in the LM-facing Allowed-Tools View:
    /// `"<mcp_id>.<name>"`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.mcp_id, self.name)
    }
}

/// A tool invocation requested by the LM during one agentic-loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub qualified_name: String,
    pub arguments: Value,
}

/// The outcome of dispatching one `ToolCall` to its MCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    pub qualified_name: String,
    pub success: bool,
    pub output: Value,
    /// Whether the call was actually permitted and sent to an MCP. `false`
    /// for an unknown tool or a permission denial; `true` for both a
    /// successful call and a genuine tool-level execution failure, since
    /// the MCP was reached either way. Used to keep permission-denied calls
    /// out of the audit trail's `tool_calls`.
    pub permitted: bool,
}

impl ToolResult {
    #[must_use]
    pub fn ok(call_id: impl Into<String>, qualified_name: impl Into<String>, output: Value) -> Self {
        Self {
            call_id: call_id.into(),
            qualified_name: qualified_name.into(),
            success: true,
            output,
            permitted: true,
        }
    }

    #[must_use]
    pub fn err(call_id: impl Into<String>, qualified_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            qualified_name: qualified_name.into(),
            success: false,
            output: Value::String(message.into()),
            permitted: true,
        }
    }

    /// A call that was never sent to an MCP because it was not permitted
    /// (unknown tool or denied by `PermissionResolver`).
    #[must_use]
    pub fn not_permitted(call_id: impl Into<String>, qualified_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            qualified_name: qualified_name.into(),
            success: false,
            output: Value::String(message.into()),
            permitted: false,
        }
    }
}
