// ABOUTME: MCP descriptor, tool policy, and health-state types
// grounded on the health/circuit-breaker convention in the teacher's monitoring code

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An MCP's own policy over which of its tools are reachable at all,
/// independent of any particular user's permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ToolPolicy {
    /// Every tool the MCP advertises is eligible.
    AllowAll,
    /// Only the named tools are eligible.
    AllowOnly { tools: Vec<String> },
    /// Every tool except the named ones is eligible.
    AllowAllExcept { tools: Vec<String> },
}

impl ToolPolicy {
    #[must_use]
    pub fn allows(&self, tool_name: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::AllowOnly { tools } => tools.iter().any(|t| t == tool_name),
            Self::AllowAllExcept { tools } => !tools.iter().any(|t| t == tool_name),
        }
    }
}

/// A configured MCP backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpDescriptor {
    pub id: String,
    pub base_url: String,
    pub enabled: bool,
    pub tool_policy: ToolPolicy,
}

/// The liveness state of one MCP, tracked by the registry's health monitor.
///
/// Transitions: `Unknown -> Healthy` on first successful probe/call,
/// `Healthy -> Unhealthy` after a failed call, `Unhealthy -> Healthy` on the
/// next successful call. There is no separate "degraded" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Unhealthy,
}

/// Health tracking for a single MCP, including when it last changed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthState {
    pub status: HealthStatus,
    pub last_transition: DateTime<Utc>,
    pub consecutive_failures: u32,
}

impl HealthState {
    #[must_use]
    pub fn unknown(now: DateTime<Utc>) -> Self {
        Self {
            status: HealthStatus::Unknown,
            last_transition: now,
            consecutive_failures: 0,
        }
    }

    /// Record a successful call, transitioning to `Healthy` if not already there.
    pub fn record_success(&mut self, now: DateTime<Utc>) {
        if self.status != HealthStatus::Healthy {
            self.status = HealthStatus::Healthy;
            self.last_transition = now;
        }
        self.consecutive_failures = 0;
    }

    /// Record a failed call, transitioning to `Unhealthy` if not already there.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.consecutive_failures += 1;
        if self.status != HealthStatus::Unhealthy {
            self.status = HealthStatus::Unhealthy;
            self.last_transition = now;
        }
    }

    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status != HealthStatus::Unhealthy
    }
}
