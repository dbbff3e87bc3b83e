//! Error types for the router
//!
//! Inference problems never surface here: the router absorbs them into a
//! degraded decision. These errors come from building a router, loading
//! configuration, converting decisions into typed skill calls and the
//! training-data tooling.

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Main error type for router operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] tooling::ToolingError),

    /// Backend construction failed
    #[error("LLM error: {0}")]
    Llm(#[from] llm::LlmError),

    /// Catalog construction failed
    #[error("Catalog error: {0}")]
    Grammar(#[from] callgrammar::GrammarError),

    /// A decision lacks an argument its typed skill call needs
    #[error("Function '{function}' is missing argument '{parameter}'")]
    MissingArgument { function: String, parameter: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A training-data line could not be read
    #[error("Training data line {line}: {message}")]
    Training { line: usize, message: String },
}

impl RouterError {
    pub fn missing(function: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingArgument {
            function: function.into(),
            parameter: parameter.into(),
        }
    }
}
