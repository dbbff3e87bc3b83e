//! Local inference servers.
//!
//! - **Ollama** - `/api/generate` in raw mode, NDJSON streaming
//! - **llama.cpp** - native `/completion` endpoint, SSE streaming

pub mod llama_cpp;
pub mod ollama;

pub use llama_cpp::LlamaCppClient;
pub use ollama::OllamaClient;
