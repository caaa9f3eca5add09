// ABOUTME: Environment-driven configuration for every bridge component
// grounded on the teacher's `config/mcp.rs` `env_var_or` pattern

mod agentic_loop;
mod permissions;
mod rate_limit;
mod registry;
mod thread_store;

pub use agentic_loop::AgenticLoopConfig;
pub use permissions::PermissionsConfig;
pub use rate_limit::RateLimiterConfig;
pub use registry::McpRegistryConfig;
pub use thread_store::ThreadStoreConfig;

use crate::errors::AppResult;
use crate::logging::LoggingConfig;

/// Read an environment variable, falling back to `default` when unset or
/// empty. Parse failures are treated as "unset" and also fall back, rather
/// than failing startup over a malformed knob.
pub(crate) fn env_var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Top-level configuration, assembled once at process start.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub logging: LoggingConfig,
    pub agentic_loop: AgenticLoopConfig,
    pub rate_limiter: RateLimiterConfig,
    pub mcp_registry: McpRegistryConfig,
    pub permissions: PermissionsConfig,
    pub thread_store: ThreadStoreConfig,
}

impl BridgeConfig {
    /// Assemble configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required (non-defaultable) value is present
    /// but cannot be parsed at all, e.g. a malformed MCP base URL.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            logging: LoggingConfig::from_env(),
            agentic_loop: AgenticLoopConfig::from_env(),
            rate_limiter: RateLimiterConfig::from_env(),
            mcp_registry: McpRegistryConfig::from_env(),
            permissions: PermissionsConfig::from_env(),
            thread_store: ThreadStoreConfig::from_env(),
        })
    }
}
