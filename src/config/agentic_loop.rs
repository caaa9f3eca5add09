// ABOUTME: Agentic loop tuning knobs: iteration ceiling, thread context size, request deadline

use crate::config::env_var_or;
use crate::constants::agentic_loop as defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AgenticLoopConfig {
    /// Maximum LM round-trips before the loop is forced to stop and return
    /// its best-effort answer (see `MaxIterationsReached`).
    pub max_iterations: u32,
    /// Number of prior thread messages prepended to a new request.
    pub thread_context_messages: usize,
    /// Wall-clock deadline for the whole request, enforced via
    /// `tokio::time::timeout` around the loop.
    pub request_timeout: Duration,
}

impl AgenticLoopConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_iterations: env_var_or("BRIDGE_MAX_ITERATIONS", defaults::DEFAULT_MAX_ITERATIONS),
            thread_context_messages: env_var_or(
                "BRIDGE_THREAD_CONTEXT_MESSAGES",
                defaults::DEFAULT_THREAD_CONTEXT_MESSAGES,
            ),
            request_timeout: Duration::from_secs(env_var_or(
                "BRIDGE_REQUEST_TIMEOUT_SECS",
                defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
        }
    }
}
