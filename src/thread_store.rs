// ABOUTME: In-process conversational context store with TTL eviction
// explicitly not durable across restarts — see SPEC_FULL.md Non-goals

use crate::config::ThreadStoreConfig;
use crate::models::{ThreadContext, ThreadMessage};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

struct Entry {
    context: ThreadContext,
    last_touched: DateTime<Utc>,
}

/// Bounded, in-memory conversation context keyed by conversation id.
/// Entries untouched for `config.ttl` are swept by `sweep`, which a caller
/// is expected to run on a background interval (see `config.sweep_interval`).
pub struct ThreadStore {
    config: ThreadStoreConfig,
    threads: DashMap<String, Entry>,
}

impl ThreadStore {
    #[must_use]
    pub fn new(config: ThreadStoreConfig) -> Self {
        Self {
            config,
            threads: DashMap::new(),
        }
    }

    /// Append a message to a conversation's context, creating it if absent.
    pub fn append(&self, conversation_id: &str, message: ThreadMessage, max_len: usize, now: DateTime<Utc>) {
        let mut entry = self.threads.entry(conversation_id.to_owned()).or_insert_with(|| Entry {
            context: ThreadContext::new(),
            last_touched: now,
        });
        entry.context.push(message, max_len);
        entry.last_touched = now;
    }

    /// Most recent `n` messages for a conversation, oldest first, or an
    /// empty slice if the conversation is unknown.
    #[must_use]
    pub fn recent(&self, conversation_id: &str, n: usize) -> Vec<crate::models::ThreadMessage> {
        self.threads
            .get(conversation_id)
            .map(|e| e.context.recent(n).to_vec())
            .unwrap_or_default()
    }

    /// Remove every conversation untouched since before `now - config.ttl`.
    /// Returns the number of conversations evicted.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let ttl = chrono::Duration::from_std(self.config.ttl).unwrap_or_default();
        let cutoff = now - ttl;
        let stale: Vec<String> = self
            .threads
            .iter()
            .filter(|e| e.last_touched < cutoff)
            .map(|e| e.key().clone())
            .collect();
        for key in &stale {
            self.threads.remove(key);
        }
        stale.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
