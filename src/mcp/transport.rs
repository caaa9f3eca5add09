// ABOUTME: Transport abstraction over MCP wire protocols
// grounded on the teacher's `cache::CacheBackend` / `database_plugins::DatabaseProvider`
// generic-over-backend pattern: one trait, swappable concrete implementations

use crate::errors::AppResult;
use crate::models::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;

/// One MCP backend's wire protocol, abstracted behind a single trait so the
/// registry and agentic loop never depend on HTTP, streaming, or stdio
/// specifics directly.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Discover the tools this MCP currently advertises.
    async fn list_tools(&self) -> AppResult<Vec<ToolSchema>>;

    /// Invoke a tool by its unqualified name with the given arguments.
    async fn call_tool(&self, tool_name: &str, arguments: Value) -> AppResult<Value>;

    /// Cheap liveness probe used by the health monitor.
    async fn ping(&self) -> AppResult<()>;
}
