// ABOUTME: MCP registry configuration: schema cache TTL and background refresh interval

use crate::config::env_var_or;
use crate::constants::mcp_registry as defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct McpRegistryConfig {
    /// How long a cached tool schema is considered fresh.
    pub schema_ttl: Duration,
    /// How often the background task re-discovers tools from each MCP.
    pub refresh_interval: Duration,
}

impl McpRegistryConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            schema_ttl: Duration::from_secs(env_var_or(
                "BRIDGE_MCP_SCHEMA_TTL_SECS",
                defaults::DEFAULT_SCHEMA_TTL_SECS.max(0) as u64,
            )),
            refresh_interval: Duration::from_secs(env_var_or(
                "BRIDGE_MCP_REFRESH_INTERVAL_SECS",
                defaults::DEFAULT_REFRESH_INTERVAL_SECS,
            )),
        }
    }
}
