// ABOUTME: Sliding-window rate limiter configuration
// grounded on the teacher's `TenantRateLimitConfig::default_config` fallback pattern

use crate::config::env_var_or;
use crate::constants::rate_limit as defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Length of the sliding window.
    pub window: Duration,
}

impl RateLimiterConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            window: Duration::from_secs(env_var_or(
                "BRIDGE_RATE_LIMIT_WINDOW_SECS",
                defaults::DEFAULT_WINDOW_SECS.max(0) as u64,
            )),
        }
    }
}
