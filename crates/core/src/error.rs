//! Core error types

use thiserror::Error;

/// Core error type for the dronops workspace
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid config value for {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending key
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
