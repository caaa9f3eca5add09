// ABOUTME: User, role, and per-user permission override types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A role carries a default map of which MCPs (and which tools on them) a
/// user may call, absent any override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    /// MCP id -> allowed (true means the role's default grants this MCP,
    /// subject to the MCP's own `tool_policy`).
    pub mcp_access: HashMap<String, bool>,
    /// Requests per window granted to this role, or `None` for unlimited.
    pub rate_limit_per_window: Option<u32>,
}

impl Role {
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.rate_limit_per_window.is_none()
    }
}

/// How a user's override block restricts/expands their role defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserOverrideMode {
    /// Grants every tool on every enabled MCP, bypassing role defaults.
    All,
    /// Grants only tools whose qualified name matches one of `patterns`.
    Custom,
}

/// A per-user override of their role's default Allowed-Tools View.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOverride {
    pub mode: UserOverrideMode,
    /// Glob patterns (see `bridge_core::glob`) over qualified tool names,
    /// e.g. `"postgres.get_*"`. Only meaningful when `mode` is `Custom`.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// A chat user known to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub override_: Option<UserOverride>,
}

impl User {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            override_: None,
        }
    }

    #[must_use]
    pub fn with_override(mut self, override_: UserOverride) -> Self {
        self.override_ = Some(override_);
        self
    }
}
