//! Structured logging infrastructure for dronops.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.
//! Library crates only emit `tracing` events; binaries call one of these.
//! Output goes to stderr so command output on stdout stays machine-readable.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, falls back to `default_level`.
///
/// # Example
/// ```no_run
/// use dronops_core::logging;
///
/// logging::init("info");
/// tracing::info!("Coordinator started");
/// ```
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

/// Initialize the logging system with JSON output for log aggregation.
///
/// # Example
/// ```no_run
/// use dronops_core::logging;
///
/// logging::init_json("debug");
/// tracing::info!(service = "dronops-node", "Service started");
/// ```
pub fn init_json(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
        .init();
}

/// Initialize logging from the `[logging]` config section.
pub fn init_from_config(config: &LoggingConfig) {
    match config.format {
        LogFormat::Plain => init(&config.level),
        LogFormat::Json => init_json(&config.level),
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
