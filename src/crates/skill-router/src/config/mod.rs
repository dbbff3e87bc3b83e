//! Configuration management for the skill router
//!
//! Supports dual-location configuration:
//! - User-level: ~/.skill-router/config.toml
//! - Project-level: ./.skill-router/config.toml
//!
//! Project-level config overrides user-level config key by key, and
//! `SKILL_ROUTER_*` environment variables override both.

mod loader;
mod schema;

pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{
    BackendConfig, BackendKind, GateConfig, LoggingConfig, ParserConfig, ResidencyConfig,
    RouterConfig,
};

use crate::Result;

/// Load configuration from both locations
pub fn load_config() -> Result<RouterConfig> {
    ConfigLoader::new().load()
}
