//! Raw-prompt inference against local LLM servers.
//!
//! The router model is driven with a fully rendered prompt and its output is
//! read back verbatim, so this crate exposes a single narrow seam,
//! [`InferenceBackend`], rather than a chat abstraction.
//!
//! # Backends
//!
//! - **Ollama** - `/api/generate` with `raw: true`
//! - **llama.cpp** - native `/completion`
//!
//! Ollama additionally supports [`ModelResidency`]: unloading other models of
//! the router's family before inference.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{GenerateRequest, InferenceBackend, LocalLlmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LocalLlmConfig::new("http://localhost:11434", "functiongemma");
//!     let client = OllamaClient::new(config)?;
//!
//!     let request = GenerateRequest::new(prompt)
//!         .with_stop(["<end_of_turn>", "<start_function_response>"])
//!         .with_seed(42);
//!     let generation = client.generate(request).await?;
//!     println!("{}", generation.into_raw_text());
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod provider_utils;

#[macro_use]
mod provider_macros;

pub mod local;
pub mod residency;

pub use backend::{
    collect_stream, GenerateRequest, Generation, GenerationChunk, GenerationStream,
    InferenceBackend,
};
pub use config::LocalLlmConfig;
pub use error::{LlmError, Result};
pub use local::{LlamaCppClient, OllamaClient};
pub use provider_utils::{ModelInfo, ProviderUtils};
pub use residency::{family_of, ModelResidency, NoopResidency, OllamaResidency};
