//! Configuration builder trait
//!
//! Gives configuration structs one loading pipeline: defaults, then layered
//! TOML files, then environment overrides, then validation.

use crate::config::layers::read_layers;
use crate::{Result, ToolingError};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Trait for configuration structures loaded from files and the environment
///
/// # Example
///
/// ```rust,ignore
/// use tooling::config::{ConfigBuilder, EnvOverrides};
///
/// #[derive(Clone, Default, serde::Deserialize)]
/// #[serde(default)]
/// struct ServerConfig {
///     port: u16,
/// }
///
/// impl ConfigBuilder for ServerConfig {
///     fn validate(&self) -> tooling::Result<()> {
///         if self.port == 0 {
///             return Err(tooling::ToolingError::Validation("port must be non-zero".into()));
///         }
///         Ok(())
///     }
///
///     fn apply_env(&mut self, prefix: &str) -> tooling::Result<()> {
///         if let Some(port) = EnvOverrides::new(prefix).parse("port")? {
///             self.port = port;
///         }
///         Ok(())
///     }
/// }
///
/// let config = ServerConfig::load_layered(&[user_path, project_path], "APP_")?;
/// ```
pub trait ConfigBuilder: Default + Clone + DeserializeOwned {
    /// Validate the configuration
    ///
    /// Should check that values are within range and that fields agree with
    /// each other.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Override fields from `{PREFIX}{FIELD}` environment variables
    ///
    /// Variables that are not set leave the field untouched.
    fn apply_env(&mut self, prefix: &str) -> Result<()>;

    /// Defaults with environment overrides, validated
    fn from_env(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(prefix)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserialize from a TOML document; missing fields take their defaults
    fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ToolingError::Validation(e.to_string()))
    }

    /// Merge every existing file in `paths` (later files win), apply
    /// environment overrides and validate
    fn load_layered<P: AsRef<Path>>(paths: &[P], prefix: &str) -> Result<Self> {
        let merged = read_layers(paths)?;
        let mut config: Self = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ToolingError::Validation(e.to_string()))?;
        config.apply_env(prefix)?;
        config.validate()?;
        Ok(config)
    }
}
