//! Connection settings for local inference servers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for local LLM servers (Ollama, llama.cpp).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// Base URL for the local LLM server.
    ///
    /// Examples:
    /// - Ollama: "http://localhost:11434"
    /// - llama.cpp: "http://localhost:8080"
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// HTTP request timeout.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// How long Ollama keeps the model loaded after a request (e.g. "1m").
    #[serde(default)]
    pub keep_alive: Option<String>,
}

impl LocalLlmConfig {
    /// Create a new local LLM configuration.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout: default_timeout(),
            keep_alive: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the keep-alive hint sent with each generation.
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
