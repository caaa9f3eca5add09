// ABOUTME: Per-user Allowed-Tools View resolution
// grounded on the teacher's `mcp::tool_selection::ToolSelectionService`
// (precedence chain + per-key TTL cache over a `DashMap`)

use crate::config::PermissionsConfig;
use crate::models::{HealthState, McpDescriptor, ToolSchema, User, UserOverrideMode};
use bridge_core::{glob, permission::DenyReason, PermissionDecision};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A user's resolved Allowed-Tools View: the qualified tool names ("`mcp_id.tool`")
/// they may invoke right now.
#[derive(Debug, Clone)]
pub struct AllowedToolsView {
    pub tools: HashSet<String>,
    pub computed_at: DateTime<Utc>,
}

struct CacheEntry {
    view: AllowedToolsView,
}

/// Resolves per-user tool permissions by walking the precedence chain:
///
/// 1. MCP must be enabled, else `McpDisabled`.
/// 2. User override `mode = all` grants every enabled MCP's tools.
/// 3. User override `mode = custom` grants only glob-matched tools,
///    otherwise `UserPolicyExcluded`.
/// 4. The MCP's own `tool_policy` must allow the tool, else `McpPolicyExcluded`.
/// 5. The role's default MCP access map must grant the MCP, else `RoleDefault` deny.
///
/// Resolution is a pure function of (user, role, MCP descriptors, tool
/// schemas) — no network or I/O — so it is cheap to test and to cache.
pub struct PermissionResolver {
    config: PermissionsConfig,
    cache: DashMap<String, CacheEntry>,
}

impl PermissionResolver {
    #[must_use]
    pub fn new(config: PermissionsConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
        }
    }

    /// Evaluate a single qualified tool name against a user's permissions,
    /// without consulting or populating the view cache. Used by the
    /// agentic loop to re-validate a tool call the LM picked from a
    /// possibly-stale view.
    #[must_use]
    pub fn evaluate(
        user: &User,
        mcp: Option<&McpDescriptor>,
        tool: Option<&ToolSchema>,
    ) -> PermissionDecision {
        let (Some(mcp), Some(tool)) = (mcp, tool) else {
            return PermissionDecision::deny(DenyReason::UnknownTool);
        };

        if !mcp.enabled {
            return PermissionDecision::deny(DenyReason::McpDisabled);
        }

        let qualified = tool.qualified_name();

        if let Some(override_) = &user.override_ {
            return match override_.mode {
                UserOverrideMode::All => PermissionDecision::allow(DenyReason::UserOverride),
                UserOverrideMode::Custom => {
                    if glob::any_match(override_.patterns.iter().map(String::as_str), &qualified) {
                        PermissionDecision::allow(DenyReason::UserOverride)
                    } else {
                        PermissionDecision::deny(DenyReason::UserPolicyExcluded)
                    }
                }
            };
        }

        if !mcp.tool_policy.allows(&tool.name) {
            return PermissionDecision::deny(DenyReason::McpPolicyExcluded);
        }

        match user.role.mcp_access.get(&mcp.id) {
            Some(true) => PermissionDecision::allow(DenyReason::RoleDefault),
            _ => PermissionDecision::deny(DenyReason::RoleDefault),
        }
    }

    /// Compute (or return the cached) Allowed-Tools View for `user`, given
    /// the current set of MCP descriptors and their tool schemas. An
    /// unhealthy MCP is excluded from the view entirely, independent of
    /// permission outcome, since there is nothing usable to allow.
    #[must_use]
    pub fn resolve(
        &self,
        user: &User,
        mcps: &[(Arc<McpDescriptor>, HealthState, Vec<ToolSchema>)],
        now: DateTime<Utc>,
    ) -> AllowedToolsView {
        if let Some(entry) = self.cache.get(&user.id) {
            let age = now - entry.view.computed_at;
            if age.num_seconds() >= 0
                && (age.to_std().unwrap_or_default()) < self.config.cache_ttl
            {
                return entry.view.clone();
            }
        }

        let mut tools = HashSet::new();
        for (mcp, health, schemas) in mcps {
            if !health.is_usable() {
                continue;
            }
            for schema in schemas {
                let decision = Self::evaluate(user, Some(mcp), Some(schema));
                if decision.allowed {
                    tools.insert(schema.qualified_name());
                }
            }
        }

        let view = AllowedToolsView {
            tools,
            computed_at: now,
        };
        self.cache.insert(user.id.clone(), CacheEntry { view: view.clone() });
        view
    }

    /// Invalidate one user's cached view, e.g. after their role or override changes.
    pub fn invalidate(&self, user_id: &str) {
        self.cache.remove(user_id);
    }

    /// Invalidate every cached view, e.g. after an MCP's policy changes.
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, ToolPolicy, UserOverride};
    use std::collections::HashMap;

    fn role_with(mcp_id: &str, allowed: bool) -> Role {
        let mut mcp_access = HashMap::new();
        mcp_access.insert(mcp_id.to_owned(), allowed);
        Role {
            name: "member".to_owned(),
            mcp_access,
            rate_limit_per_window: Some(100),
        }
    }

    fn mcp(id: &str, enabled: bool, policy: ToolPolicy) -> McpDescriptor {
        McpDescriptor {
            id: id.to_owned(),
            base_url: "http://localhost".to_owned(),
            enabled,
            tool_policy: policy,
        }
    }

    fn tool(mcp_id: &str, name: &str) -> ToolSchema {
        ToolSchema {
            mcp_id: mcp_id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            input_schema: serde_json::json!({}),
        }
    }

    #[test]
    fn role_default_allows_when_mcp_enabled_and_granted() {
        let user = User::new("u1", role_with("postgres", true));
        let mcp = mcp("postgres", true, ToolPolicy::AllowAll);
        let t = tool("postgres", "get_health");
        let decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&t));
        assert!(decision.allowed);
        assert_eq!(decision.reason, DenyReason::RoleDefault);
    }

    #[test]
    fn mcp_disabled_denies_regardless_of_role() {
        let user = User::new("u1", role_with("postgres", true));
        let mcp = mcp("postgres", false, ToolPolicy::AllowAll);
        let t = tool("postgres", "get_health");
        let decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&t));
        assert!(!decision.allowed);
        assert_eq!(decision.reason, DenyReason::McpDisabled);
    }

    #[test]
    fn mcp_policy_exclusion_overrides_role_default() {
        let user = User::new("u1", role_with("postgres", true));
        let mcp = mcp(
            "postgres",
            true,
            ToolPolicy::AllowAllExcept {
                tools: vec!["drop_table".to_owned()],
            },
        );
        let t = tool("postgres", "drop_table");
        let decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&t));
        assert!(!decision.allowed);
        assert_eq!(decision.reason, DenyReason::McpPolicyExcluded);
    }

    #[test]
    fn user_override_all_bypasses_role_default() {
        let mut user = User::new("u1", role_with("postgres", false));
        user.override_ = Some(UserOverride {
            mode: UserOverrideMode::All,
            patterns: vec![],
        });
        let mcp = mcp("postgres", true, ToolPolicy::AllowAll);
        let t = tool("postgres", "get_health");
        let decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&t));
        assert!(decision.allowed);
        assert_eq!(decision.reason, DenyReason::UserOverride);
    }

    #[test]
    fn user_override_all_bypasses_restrictive_mcp_tool_policy() {
        let mut user = User::new("u1", role_with("postgres", false));
        user.override_ = Some(UserOverride {
            mode: UserOverrideMode::All,
            patterns: vec![],
        });
        let mcp = mcp(
            "postgres",
            true,
            ToolPolicy::AllowOnly {
                tools: vec!["get_health".to_owned()],
            },
        );
        let t = tool("postgres", "drop_table");
        let decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&t));
        assert!(decision.allowed, "an override grants the tool regardless of the MCP's own policy");
        assert_eq!(decision.reason, DenyReason::UserOverride);
    }

    #[test]
    fn user_override_custom_requires_pattern_match() {
        let mut user = User::new("u1", role_with("postgres", false));
        user.override_ = Some(UserOverride {
            mode: UserOverrideMode::Custom,
            patterns: vec!["postgres.get_*".to_owned()],
        });
        let mcp = mcp("postgres", true, ToolPolicy::AllowAll);
        let allowed_tool = tool("postgres", "get_health");
        let denied_tool = tool("postgres", "drop_table");

        let allow_decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&allowed_tool));
        assert!(allow_decision.allowed);

        let deny_decision = PermissionResolver::evaluate(&user, Some(&mcp), Some(&denied_tool));
        assert!(!deny_decision.allowed);
        assert_eq!(deny_decision.reason, DenyReason::UserPolicyExcluded);
    }

    #[test]
    fn unknown_tool_denies() {
        let user = User::new("u1", role_with("postgres", true));
        let decision = PermissionResolver::evaluate(&user, None, None);
        assert!(!decision.allowed);
        assert_eq!(decision.reason, DenyReason::UnknownTool);
    }

    #[test]
    fn cache_is_reused_within_ttl() {
        let resolver = PermissionResolver::new(PermissionsConfig {
            cache_ttl: std::time::Duration::from_secs(300),
        });
        let user = User::new("u1", role_with("postgres", true));
        let mcp = Arc::new(mcp("postgres", true, ToolPolicy::AllowAll));
        let health = HealthState {
            status: crate::models::HealthStatus::Healthy,
            last_transition: Utc::now(),
            consecutive_failures: 0,
        };
        let schemas = vec![tool("postgres", "get_health")];
        let now = Utc::now();

        let first = resolver.resolve(&user, &[(mcp.clone(), health.clone(), schemas.clone())], now);
        assert_eq!(first.tools.len(), 1);

        let second = resolver.resolve(&user, &[(mcp, health, vec![])], now);
        assert_eq!(second.tools.len(), 1, "cached view should be reused, not recomputed");
    }
}
