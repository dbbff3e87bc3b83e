//! # skill-router
//!
//! Routes assistant utterances to skills through a small local
//! function-calling model.
//!
//! ## Features
//!
//! - **Keyword Gate** - Chit-chat skips the router model entirely
//! - **Control-Token Prompts** - Declarations rendered in the grammar the model was trained on
//! - **Layered Decoding** - Clean calls, calls split by reasoning, JSON in reasoning, bare names
//! - **Argument Normalization** - Durations in seconds, 24-hour times, calendar dates
//! - **Local Backends** - Ollama and llama.cpp, blocking or streamed
//! - **Model Residency** - Sibling models unloaded before routing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skill_router::{default_catalog, Router, SkillCall};
//! use llm::{LocalLlmConfig, OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = Arc::new(default_catalog()?);
//! let backend = OllamaClient::new(LocalLlmConfig::new("http://localhost:11434", "functiongemma"))?;
//! let router = Router::new(catalog, Arc::new(backend));
//!
//! let decision = router.route("turn off the kitchen lights").await;
//! if let SkillCall::ControlLight { action, room } = decision.skill_call()? {
//!     println!("{} {}", action, room);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decision;
pub mod error;
pub mod gate;
pub mod normalize;
pub mod router;
pub mod skills;
pub mod training;

pub use config::{load_config, ConfigLoader, RouterConfig};
pub use decision::{RoutingDecision, RoutingRequest, SkillCall};
pub use error::{Result, RouterError};
pub use gate::{Gate, DEFAULT_KEYWORDS};
pub use router::{resolve_call, Router, RouterOptions};
pub use skills::{default_catalog, PASSTHROUGH};
pub use training::{
    build_examples, encode_example, read_jsonl, validate_example, write_jsonl, LabeledUtterance,
    TrainingExample, ValidationReport,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
