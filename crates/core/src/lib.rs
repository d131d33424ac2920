//! Core functionality for the dronops workspace.
//!
//! This crate carries the ambient pieces shared by the engine and the
//! operator binary: the core error type, TOML configuration and the
//! `tracing` subscriber setup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, LogFormat, LoggingConfig, PlannerConfig, StoreConfig};
pub use error::{CoreError, Result};
