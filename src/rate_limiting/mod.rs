// ABOUTME: Sliding-window rate limiting per role
// grounded on the teacher's `rate_limiting.rs` calculator structure, rewritten
// as a true sliding window (the teacher's own limiter is monthly-tier based)

use crate::config::RateLimiterConfig;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;

/// Outcome of a rate-limit admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests already counted within the current window.
    pub current_count: u32,
    /// The limit that was checked against, `None` when the role is unlimited.
    pub limit: Option<u32>,
    /// When the oldest counted request will fall out of the window, making
    /// room for one more. `None` when unlimited or when not yet at the limit.
    pub reset_at: Option<DateTime<Utc>>,
}

struct Window {
    timestamps: VecDeque<DateTime<Utc>>,
}

/// A per-key sliding-window limiter: each admitted request is timestamped,
/// and a check counts timestamps still within `window` of `now`, evicting
/// anything older first.
pub struct RateLimiter {
    config: RateLimiterConfig,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Check and, if allowed, record admission for `key` (typically
    /// `"{role}:{user_id}"` or just the role when limits are role-wide).
    /// A `None` limit means the role is unlimited and always admits.
    pub fn check_and_record(&self, key: &str, limit: Option<u32>, now: DateTime<Utc>) -> RateLimitDecision {
        let Some(limit) = limit else {
            return RateLimitDecision {
                allowed: true,
                current_count: 0,
                limit: None,
                reset_at: None,
            };
        };

        let window_span = ChronoDuration::from_std(self.config.window).unwrap_or(ChronoDuration::zero());
        let cutoff = now - window_span;

        let mut entry = self.windows.entry(key.to_owned()).or_insert_with(|| Window {
            timestamps: VecDeque::new(),
        });

        while matches!(entry.timestamps.front(), Some(ts) if *ts < cutoff) {
            entry.timestamps.pop_front();
        }

        let current_count = entry.timestamps.len() as u32;

        if current_count >= limit {
            let reset_at = entry.timestamps.front().map(|ts| *ts + window_span);
            return RateLimitDecision {
                allowed: false,
                current_count,
                limit: Some(limit),
                reset_at,
            };
        }

        entry.timestamps.push_back(now);
        RateLimitDecision {
            allowed: true,
            current_count: current_count + 1,
            limit: Some(limit),
            reset_at: None,
        }
    }
}
