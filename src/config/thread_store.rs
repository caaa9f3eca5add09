// ABOUTME: Thread store configuration: context TTL and sweep interval

use crate::config::env_var_or;
use crate::constants::thread_store as defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ThreadStoreConfig {
    /// Conversations untouched for this long are evicted.
    pub ttl: Duration,
    /// How often the background sweep task runs.
    pub sweep_interval: Duration,
}

impl ThreadStoreConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ttl: Duration::from_secs(env_var_or(
                "BRIDGE_THREAD_TTL_SECS",
                defaults::DEFAULT_TTL_SECS.max(0) as u64,
            )),
            sweep_interval: Duration::from_secs(env_var_or(
                "BRIDGE_THREAD_SWEEP_INTERVAL_SECS",
                defaults::DEFAULT_SWEEP_INTERVAL_SECS,
            )),
        }
    }
}
