//! Configuration management utilities
//!
//! - [`ConfigBuilder`] trait: one loading pipeline for every config struct
//! - Layered TOML files merged key by key
//! - [`EnvOverrides`]: `{PREFIX}{FIELD}` environment overrides

mod builder;
mod env;
mod layers;

pub use builder::ConfigBuilder;
pub use env::EnvOverrides;
pub use layers::{merge_tables, read_layer, read_layers};
