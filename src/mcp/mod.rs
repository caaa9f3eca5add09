// ABOUTME: MCP client registry: transport abstraction, health tracking, schema caching

mod http_transport;
mod registry;
mod schema_cache;
mod transport;

pub use http_transport::HttpMcpTransport;
pub use registry::McpRegistry;
pub use schema_cache::{RefreshOutcome, SchemaCache};
pub use transport::McpTransport;
