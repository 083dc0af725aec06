//! Logging setup.
//!
//! The runtime only emits `tracing` events; binaries that want to see them
//! install a subscriber with [`init_tracing`]:
//! - Console output (development)
//! - JSON structured logging (machine consumption)

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{RuntimeError, RuntimeResult};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable console output.
    Console,
    /// JSON structured logging.
    Json,
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "qirt_runtime=debug").
    pub log_level: String,
    /// Output format (console or JSON).
    pub format: TracingFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: TracingFormat::Console,
        }
    }
}

impl TracingConfig {
    /// Create a new tracing config.
    pub fn new(log_level: impl Into<String>, format: TracingFormat) -> Self {
        Self {
            log_level: log_level.into(),
            format,
        }
    }

    /// Create config from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_LOG`: Log level (default: "info")
    /// - `QIRT_LOG_FORMAT`: "console" or "json" (default: "console")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let format = match lookup("QIRT_LOG_FORMAT").as_deref() {
            Some("json") => TracingFormat::Json,
            _ => TracingFormat::Console,
        };
        Self { log_level, format }
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> RuntimeResult<()> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match config.format {
        TracingFormat::Console => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .boxed(),
        TracingFormat::Json => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| RuntimeError::Config(format!("tracing already initialized: {e}")))?;

    tracing::debug!("Tracing initialized ({:?})", config.format);
    Ok(())
}

/// Initialize tracing with configuration from the environment.
pub fn init_default_tracing() -> RuntimeResult<()> {
    init_tracing(TracingConfig::from_env())
}
