// ABOUTME: The MCP registry: holds every configured MCP's descriptor, transport,
// health state, and cached schemas, and dispatches tool calls

use crate::config::McpRegistryConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::mcp::{McpTransport, RefreshOutcome, SchemaCache};
use crate::models::{HealthState, McpDescriptor, ToolSchema};
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

struct RegisteredMcp {
    descriptor: Arc<McpDescriptor>,
    transport: Arc<dyn McpTransport>,
    health: RwLock<HealthState>,
}

/// Owns every configured MCP: its descriptor, transport, health state, and
/// cached tool schemas. Used by the permission resolver (to build the
/// Allowed-Tools View) and the agentic loop (to dispatch tool calls).
pub struct McpRegistry {
    mcps: DashMap<String, RegisteredMcp>,
    schema_cache: SchemaCache,
}

impl McpRegistry {
    #[must_use]
    pub fn new(config: McpRegistryConfig) -> Self {
        Self {
            mcps: DashMap::new(),
            schema_cache: SchemaCache::new(config),
        }
    }

    /// Register an MCP. Its health starts `Unknown` until the first probe
    /// or call succeeds or fails.
    pub fn register(&self, descriptor: McpDescriptor, transport: Arc<dyn McpTransport>) {
        let id = descriptor.id.clone();
        self.mcps.insert(
            id,
            RegisteredMcp {
                descriptor: Arc::new(descriptor),
                transport,
                health: RwLock::new(HealthState::unknown(Utc::now())),
            },
        );
    }

    #[must_use]
    pub fn descriptor(&self, mcp_id: &str) -> Option<Arc<McpDescriptor>> {
        self.mcps.get(mcp_id).map(|m| m.descriptor.clone())
    }

    /// Snapshot every registered MCP's descriptor, health, and cached
    /// schemas, refreshing any stale schema cache entries along the way. A
    /// failed refresh keeps serving the last-known-good catalog (if any)
    /// and still updates health state, since discovery failures are
    /// transport failures. Feeds directly into `PermissionResolver::resolve`.
    pub async fn snapshot(&self) -> Vec<(Arc<McpDescriptor>, HealthState, Vec<ToolSchema>)> {
        let ids: Vec<String> = self.mcps.iter().map(|e| e.key().clone()).collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(entry) = self.mcps.get(&id) else {
                continue;
            };
            let descriptor = entry.descriptor.clone();
            let transport = entry.transport.clone();
            drop(entry);

            let (schemas, outcome) = self.schema_cache.get_or_refresh(&id, &transport, Utc::now()).await;
            match outcome {
                RefreshOutcome::CacheHit => {}
                RefreshOutcome::Refreshed => self.record_outcome(&id, true).await,
                RefreshOutcome::RefreshFailed(_) => self.record_outcome(&id, false).await,
            }

            let Some(entry) = self.mcps.get(&id) else {
                continue;
            };
            let health = entry.health.read().await.clone();
            out.push((descriptor, health, schemas));
        }
        out
    }

    /// Dispatch a tool call to its MCP, updating health state based on the
    /// outcome. Only transport-level failures affect health; a tool-level
    /// failure (the MCP was reachable but the call itself failed) leaves
    /// health untouched.
    pub async fn call_tool(&self, mcp_id: &str, tool_name: &str, arguments: Value) -> AppResult<Value> {
        let Some(entry) = self.mcps.get(mcp_id) else {
            return Err(AppError::not_found(format!("mcp {mcp_id}")));
        };
        let transport = entry.transport.clone();
        drop(entry);

        let result = transport.call_tool(tool_name, arguments).await;
        match &result {
            Ok(_) => self.record_outcome(mcp_id, true).await,
            Err(err) if err.code == ErrorCode::McpTransportError => self.record_outcome(mcp_id, false).await,
            Err(_) => {}
        }
        result
    }

    /// Probe an MCP's liveness and update its health state.
    pub async fn probe(&self, mcp_id: &str) -> AppResult<()> {
        let Some(entry) = self.mcps.get(mcp_id) else {
            return Err(AppError::not_found(format!("mcp {mcp_id}")));
        };
        let transport = entry.transport.clone();
        drop(entry);

        let result = transport.ping().await;
        self.record_outcome(mcp_id, result.is_ok()).await;
        result
    }

    async fn record_outcome(&self, mcp_id: &str, success: bool) {
        if let Some(entry) = self.mcps.get(mcp_id) {
            let mut health = entry.health.write().await;
            if success {
                health.record_success(Utc::now());
            } else {
                health.record_failure(Utc::now());
            }
        }
    }

    /// Force a schema re-fetch for `mcp_id` on the next snapshot.
    pub async fn invalidate_schema(&self, mcp_id: &str) {
        self.schema_cache.invalidate(mcp_id).await;
    }
}
