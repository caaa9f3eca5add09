// ABOUTME: TTL-based tool schema cache with single-flight refresh coalescing
// grounded on the teacher's `ToolSelectionService` LRU+TTL cache shape

use crate::config::McpRegistryConfig;
use crate::errors::AppError;
use crate::mcp::McpTransport;
use crate::models::ToolSchema;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

struct Entry {
    schemas: Vec<ToolSchema>,
    fetched_at: DateTime<Utc>,
}

/// The outcome of a `get_or_refresh` call, distinguishing "the cache was
/// still fresh" from "a refresh happened" so the caller can decide whether
/// to update MCP health state.
pub enum RefreshOutcome {
    /// The cached entry was still within its TTL; no transport call was made.
    CacheHit,
    /// A transport call was made and succeeded.
    Refreshed,
    /// A transport call was made and failed; the schemas returned alongside
    /// this outcome are the last-known-good catalog (possibly empty if none
    /// was ever fetched successfully).
    RefreshFailed(AppError),
}

/// Caches each MCP's tool schemas for `config.schema_ttl`. Concurrent
/// refreshes for the same MCP are coalesced behind a per-MCP lock so a
/// cache stampede on expiry only produces one upstream `list-tools` call.
///
/// A failed refresh never discards the existing entry: the stale catalog
/// (if any) keeps serving until the next successful refresh.
pub struct SchemaCache {
    config: McpRegistryConfig,
    entries: Mutex<HashMap<String, Entry>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new(config: McpRegistryConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached schemas for `mcp_id`, refreshing via `transport`
    /// first if the entry is missing or stale. On refresh failure the
    /// previous entry (if any) is left untouched and returned.
    pub async fn get_or_refresh(
        &self,
        mcp_id: &str,
        transport: &Arc<dyn McpTransport>,
        now: DateTime<Utc>,
    ) -> (Vec<ToolSchema>, RefreshOutcome) {
        let mut entries = self.entries.lock().await;

        let is_fresh = entries
            .get(mcp_id)
            .is_some_and(|e| (now - e.fetched_at).to_std().unwrap_or_default() < self.config.schema_ttl);

        if is_fresh {
            let schemas = entries.get(mcp_id).map(|e| e.schemas.clone()).unwrap_or_default();
            return (schemas, RefreshOutcome::CacheHit);
        }

        match transport.list_tools().await {
            Ok(schemas) => {
                entries.insert(
                    mcp_id.to_owned(),
                    Entry {
                        schemas: schemas.clone(),
                        fetched_at: now,
                    },
                );
                (schemas, RefreshOutcome::Refreshed)
            }
            Err(err) => {
                let stale = entries.get(mcp_id).map(|e| e.schemas.clone()).unwrap_or_default();
                (stale, RefreshOutcome::RefreshFailed(err))
            }
        }
    }

    /// Force the next `get_or_refresh` call for `mcp_id` to hit the transport.
    pub async fn invalidate(&self, mcp_id: &str) {
        self.entries.lock().await.remove(mcp_id);
    }
}
