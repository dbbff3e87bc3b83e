//! Configuration schema for the skill router

use callgrammar::{ParseStrategy, DEFAULT_STOP_SEQUENCES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::gate::DEFAULT_KEYWORDS;

/// Main router configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RouterConfig {
    /// Inference backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Keyword gate configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// Call parser configuration
    #[serde(default)]
    pub parser: ParserConfig,

    /// Model residency configuration
    #[serde(default)]
    pub residency: ResidencyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which local inference server to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Ollama,
    LlamaCpp,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "llama_cpp" | "llama-cpp" | "llamacpp" => Ok(BackendKind::LlamaCpp),
            other => Err(format!("unknown backend kind '{}'", other)),
        }
    }
}

/// Inference backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Server flavour: "ollama" or "llama_cpp"
    pub kind: BackendKind,

    /// Server base URL
    pub base_url: String,

    /// Router model name
    pub model: String,

    /// Per-call inference timeout in seconds
    pub timeout_secs: u64,

    /// Generation budget in tokens
    pub max_tokens: u32,

    /// Sampling temperature; 0 is greedy
    pub temperature: f32,

    /// Sampling seed
    pub seed: Option<u64>,

    /// Stop sequences
    pub stop: Vec<String>,

    /// Use streamed generation and accumulate the chunks
    pub stream: bool,

    /// Keep-alive hint sent with each request (Ollama only)
    pub keep_alive: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "functiongemma".to_string(),
            timeout_secs: 30,
            max_tokens: 150,
            temperature: 0.0,
            seed: Some(42),
            stop: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
            stream: false,
            keep_alive: None,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Keyword gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Disable to send every utterance to the router model
    pub enabled: bool,

    /// Keywords that send an utterance to the router model
    pub keywords: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Call parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Recovery strategies in the order they are tried
    pub order: Vec<ParseStrategy>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            order: callgrammar::DecodeOptions::default().order,
        }
    }
}

/// Model residency configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidencyConfig {
    /// Unload other models of the same family before routing (Ollama only)
    pub enabled: bool,

    /// Family marker overriding the name-before-tag rule
    pub family: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
