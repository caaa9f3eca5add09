// ABOUTME: Permission decision types shared by the resolver and its callers
// ABOUTME: Kept free of database/async dependencies so it can be unit tested in isolation

use serde::{Deserialize, Serialize};

/// Why a tool was allowed or denied for a user.
///
/// Mirrors the evaluation order in the permission resolver: each variant
/// corresponds to the step of the precedence chain that produced the
/// decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Tool allowed via the role's default MCP access map or the MCP's
    /// `allow_all` / `allow_only` policy.
    RoleDefault,
    /// Tool allowed via a user-specific override block.
    UserOverride,
    /// The host MCP is not enabled.
    McpDisabled,
    /// The MCP's `tool_policy` excluded this tool.
    McpPolicyExcluded,
    /// A user override's custom pattern list excluded this tool.
    UserPolicyExcluded,
    /// The tool name does not resolve to any known MCP/tool pair.
    UnknownTool,
}

impl DenyReason {
    /// Short machine-stable tag, suitable for audit/log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoleDefault => "role_default",
            Self::UserOverride => "user_override",
            Self::McpDisabled => "mcp_disabled",
            Self::McpPolicyExcluded => "mcp_policy_excluded",
            Self::UserPolicyExcluded => "user_policy_excluded",
            Self::UnknownTool => "unknown_tool",
        }
    }
}

/// The outcome of evaluating one tool against one user's permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDecision {
    /// Whether the tool may be invoked.
    pub allowed: bool,
    /// The step of the precedence chain that produced this decision.
    pub reason: DenyReason,
}

impl PermissionDecision {
    /// Construct an allow decision with the given reason.
    #[must_use]
    pub const fn allow(reason: DenyReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    /// Construct a deny decision with the given reason.
    #[must_use]
    pub const fn deny(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
