// ABOUTME: Structured logging setup for the bridge, driven by environment variables
// grounded on the teacher's `logging.rs` (RUST_LOG / LOG_FORMAT / ENVIRONMENT)

use crate::constants::service_names;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colorized. Default outside production.
    Pretty,
    /// One JSON object per line. Default in production.
    Json,
    /// Single-line, no color — useful for CI logs.
    Compact,
}

impl LogFormat {
    fn from_env_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Build from `RUST_LOG`, `LOG_FORMAT`, and `ENVIRONMENT`.
    ///
    /// `LOG_FORMAT` wins if set; otherwise `ENVIRONMENT=production` implies
    /// JSON and anything else implies pretty-printed output.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
        let format = std::env::var("LOG_FORMAT").map_or_else(
            |_| {
                let environment = std::env::var("ENVIRONMENT").unwrap_or_default();
                if environment.eq_ignore_ascii_case("production") {
                    LogFormat::Json
                } else {
                    LogFormat::Pretty
                }
            },
            |v| LogFormat::from_env_str(&v),
        );
        Self { filter, format }
    }
}

/// Initialize the global `tracing` subscriber. Call once at process start.
pub fn init(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);

    match config.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
    }

    tracing::info!(service = service_names::BRIDGE_SERVER, "logging initialized");
}
