// ABOUTME: Permission resolver configuration: per-user resolved-view cache TTL

use crate::config::env_var_or;
use crate::constants::permissions as defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PermissionsConfig {
    /// How long a user's resolved Allowed-Tools View is cached before
    /// being recomputed from role/override/MCP policy state.
    pub cache_ttl: Duration,
}

impl PermissionsConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cache_ttl: Duration::from_secs(env_var_or(
                "BRIDGE_PERMISSIONS_CACHE_TTL_SECS",
                defaults::DEFAULT_CACHE_TTL_SECS.max(0) as u64,
            )),
        }
    }
}
