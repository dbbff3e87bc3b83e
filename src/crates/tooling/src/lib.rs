//! Shared helpers for the skill-router workspace
//!
//! # Modules
//!
//! - `config` - Layered TOML files, environment overrides and validation
//! - `async_utils` - Timeout wrapper for async operations
//! - `logging` - Scope timing guards and duration formatting

pub mod async_utils;
pub mod config;
pub mod logging;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed or deserialized
    #[error("Invalid configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// An environment override is unreadable or malformed
    #[error("Invalid environment variable {key}: {message}")]
    Env { key: String, message: String },

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;
