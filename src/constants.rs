// ABOUTME: Application-wide constants for the MCP orchestration bridge
// ABOUTME: Defaults named here are the ones SPEC_FULL.md calls out explicitly

/// HTTP status codes used by `errors::ErrorCode::http_status`.
pub mod http_status {
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const TOO_MANY_REQUESTS: u16 = 429;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    pub const BAD_GATEWAY: u16 = 502;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

/// Agentic loop defaults.
pub mod agentic_loop {
    /// Default maximum number of LM round-trips per request.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 10;
    /// Default number of prior thread messages prepended to a new request.
    pub const DEFAULT_THREAD_CONTEXT_MESSAGES: usize = 3;
    /// Default per-request deadline.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Rate limiter defaults.
pub mod rate_limit {
    /// Sliding window length.
    pub const DEFAULT_WINDOW_SECS: i64 = 3_600;
}

/// Thread store defaults.
pub mod thread_store {
    /// Entries untouched for this long are swept.
    pub const DEFAULT_TTL_SECS: i64 = 24 * 3_600;
    /// How often the background sweep runs.
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
}

/// MCP registry / tool-schema cache defaults.
pub mod mcp_registry {
    /// Tool schema cache freshness window.
    pub const DEFAULT_SCHEMA_TTL_SECS: i64 = 300;
    /// Background discovery refresh interval.
    pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
}

/// Permission resolver defaults.
pub mod permissions {
    /// Per-user resolved-view cache TTL.
    pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;
}

/// LM adapter defaults: per-million-token USD pricing.
pub mod lm_pricing {
    pub const DEFAULT_INPUT_PRICE_PER_MILLION: f64 = 0.80;
    pub const DEFAULT_OUTPUT_PRICE_PER_MILLION: f64 = 4.00;
    pub const DEFAULT_CACHED_PRICE_PER_MILLION: f64 = 0.08;
}

/// Service identity used in structured log output.
pub mod service_names {
    pub const BRIDGE_SERVER: &str = "mcp-bridge-server";
}
