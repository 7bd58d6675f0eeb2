//! Logging initialization for binaries and hosts embedding the isolation layer
//!
//! - Respects RUST_LOG environment variable
//! - Falls back to the filter from `LoggingConfig`, then to "info"
//! - Respects NO_COLOR
//!
//! # Usage
//! ```rust,no_run
//! use artifact_isolation::utils::init_logging;
//!
//! init_logging(None); // Uses RUST_LOG or defaults to "info"
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::env::{env_bool, env_opt};

/// Forces JSON output regardless of config (needs the `json-logging` feature)
pub const LOG_JSON_ENV: &str = "ARTIFACT_ISOLATION_LOG_JSON";

/// RUST_LOG first, then the configured filter, then "info"
fn build_filter(filter: Option<&str>) -> EnvFilter {
    if env_opt("RUST_LOG").is_some() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(filter.unwrap_or("info"))
}

/// Initialize human-readable logging to stderr
///
/// # Arguments
/// * `filter` - Optional log filter from config (e.g., "info", "artifact_isolation=debug").
///   If None, uses RUST_LOG environment variable or defaults to "info"
pub fn init_logging(filter: Option<&str>) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(env_opt("NO_COLOR").is_none()),
        )
        .with(build_filter(filter))
        .init();
}

/// Initialize logging with JSON output (for production/monitoring)
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(build_filter(filter))
        .init();
}

/// Initialize logging from `LoggingConfig`
///
/// RUST_LOG always takes precedence over the configured filter.
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    let filter = config.and_then(|c| c.filter.as_deref());
    let json = config.map(|c| c.json_format).unwrap_or(false) || env_bool(LOG_JSON_ENV);

    #[cfg(feature = "json-logging")]
    {
        if json {
            init_json_logging(filter);
            return;
        }
    }

    init_logging(filter);

    #[cfg(not(feature = "json-logging"))]
    {
        if json {
            tracing::warn!("JSON logging requested but the json-logging feature is disabled");
        }
    }
}
