//! Configuration loader with dual-location support
//!
//! Loads configuration from:
//! 1. Default values
//! 2. User-level config: ~/.skill-router/config.toml
//! 3. Project-level config: ./.skill-router/config.toml
//! 4. An explicit file given on the command line
//! 5. `SKILL_ROUTER_*` environment variables
//!
//! Later sources override earlier ones.

use crate::config::schema::{BackendKind, RouterConfig};
use crate::error::Result;
use callgrammar::ParseStrategy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tooling::config::{ConfigBuilder, EnvOverrides};
use tooling::ToolingError;
use tracing::{debug, info};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "SKILL_ROUTER_";

const CONFIG_DIR: &str = ".skill-router";
const CONFIG_FILE: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ConfigBuilder for RouterConfig {
    fn validate(&self) -> tooling::Result<()> {
        let invalid = |msg: String| Err(ToolingError::Validation(msg));

        let backend = &self.backend;
        if !backend.base_url.starts_with("http://") && !backend.base_url.starts_with("https://") {
            return invalid(format!("backend.base_url must be an http(s) URL, got '{}'", backend.base_url));
        }
        if backend.model.trim().is_empty() {
            return invalid("backend.model must not be empty".to_string());
        }
        if backend.timeout_secs == 0 {
            return invalid("backend.timeout_secs must be greater than 0".to_string());
        }
        if backend.max_tokens == 0 {
            return invalid("backend.max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&backend.temperature) {
            return invalid(format!("backend.temperature must be within 0.0..=2.0, got {}", backend.temperature));
        }

        if self.parser.order.is_empty() {
            return invalid("parser.order must name at least one strategy".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.parser.order.iter().find(|s| !seen.insert(**s)) {
            return invalid(format!("parser.order lists {:?} twice", dup));
        }

        if self.residency.enabled && self.backend.kind != BackendKind::Ollama {
            return invalid("residency is only supported with the ollama backend".to_string());
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return invalid(format!("logging.level '{}' is not one of {:?}", self.logging.level, LOG_LEVELS));
        }

        Ok(())
    }

    fn apply_env(&mut self, prefix: &str) -> tooling::Result<()> {
        let env = EnvOverrides::new(prefix);

        let backend = &mut self.backend;
        if let Some(kind) = env.parse::<BackendKind>("backend")? {
            backend.kind = kind;
        }
        if let Some(url) = env.text("base_url")? {
            backend.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = env.text("model")? {
            backend.model = model;
        }
        if let Some(secs) = env.parse("timeout_secs")? {
            backend.timeout_secs = secs;
        }
        if let Some(tokens) = env.parse("max_tokens")? {
            backend.max_tokens = tokens;
        }
        if let Some(temperature) = env.parse("temperature")? {
            backend.temperature = temperature;
        }
        if let Some(seed) = env.parse("seed")? {
            backend.seed = Some(seed);
        }
        if let Some(stream) = env.flag("stream")? {
            backend.stream = stream;
        }
        if let Some(keep_alive) = env.text("keep_alive")? {
            backend.keep_alive = Some(keep_alive);
        }

        if let Some(enabled) = env.flag("gate_enabled")? {
            self.gate.enabled = enabled;
        }
        if let Some(keywords) = env.list("gate_keywords")? {
            self.gate.keywords = keywords;
        }

        if let Some(order) = env.list("parser_order")? {
            self.parser.order = order
                .iter()
                .map(|s| parse_strategy(s))
                .collect::<tooling::Result<_>>()?;
        }

        if let Some(enabled) = env.flag("residency_enabled")? {
            self.residency.enabled = enabled;
        }
        if let Some(family) = env.text("residency_family")? {
            self.residency.family = Some(family);
        }

        if let Some(level) = env.text("log_level")? {
            self.logging.level = level.to_lowercase();
        }

        Ok(())
    }
}

fn parse_strategy(name: &str) -> tooling::Result<ParseStrategy> {
    match name.to_lowercase().as_str() {
        "strict" => Ok(ParseStrategy::Strict),
        "thinking_json" => Ok(ParseStrategy::ThinkingJson),
        "name_only" => Ok(ParseStrategy::NameOnly),
        other => Err(ToolingError::Validation(format!("unknown parse strategy '{}'", other))),
    }
}

/// Configuration loader that handles both user and project configs
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
    explicit_path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the standard locations
    pub fn new() -> Self {
        Self {
            user_config_path: dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE)),
            project_config_path: std::env::current_dir()
                .ok()
                .map(|cwd| cwd.join(CONFIG_DIR).join(CONFIG_FILE)),
            explicit_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Loader over caller-chosen locations
    pub fn with_paths(user: Option<PathBuf>, project: Option<PathBuf>) -> Self {
        Self {
            user_config_path: user,
            project_config_path: project,
            ..Self::new()
        }
    }

    /// Layer one more file on top of the standard locations
    ///
    /// Unlike the standard locations, this file must exist.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Read environment overrides under a different prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    pub fn project_config_path(&self) -> Option<&Path> {
        self.project_config_path.as_deref()
    }

    /// Load, merge, override and validate
    pub fn load(&self) -> Result<RouterConfig> {
        if let Some(explicit) = &self.explicit_path {
            if !explicit.exists() {
                return Err(ToolingError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Config file not found: {}", explicit.display()),
                ))
                .into());
            }
        }

        let paths: Vec<&Path> = [
            self.user_config_path.as_deref(),
            self.project_config_path.as_deref(),
            self.explicit_path.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in &paths {
            if path.exists() {
                debug!(path = %path.display(), "Layering config file");
            }
        }

        let config = RouterConfig::load_layered(&paths, &self.env_prefix)?;
        info!(
            backend = ?config.backend.kind,
            model = %config.backend.model,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn loader(user: Option<PathBuf>, project: Option<PathBuf>) -> ConfigLoader {
        // Prefix nobody sets, so the host environment cannot leak in
        ConfigLoader::with_paths(user, project).with_env_prefix("SKILL_ROUTER_LOADER_TEST_")
    }

    #[test]
    fn test_defaults_when_no_files() {
        let dir = TempDir::new().unwrap();
        let config = loader(Some(dir.path().join("missing.toml")), None).load().unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.backend.stop, ["<end_of_turn>", "<start_function_response>"]);
        assert_eq!(config.backend.seed, Some(42));
    }

    #[test]
    fn test_project_overrides_user_key_by_key() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.toml",
            "[backend]\nmodel = \"router-a\"\ntimeout_secs = 10\n\n[gate]\nenabled = false\n",
        );
        let project = write(&dir, "project.toml", "[backend]\nmodel = \"router-b\"\n");

        let config = loader(Some(user), Some(project)).load().unwrap();
        assert_eq!(config.backend.model, "router-b");
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(!config.gate.enabled);
        assert_eq!(config.backend.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_parser_order_and_backend_kind() {
        let dir = TempDir::new().unwrap();
        let project = write(
            &dir,
            "project.toml",
            "[backend]\nkind = \"llama_cpp\"\nbase_url = \"http://localhost:8080\"\n\n[parser]\norder = [\"name_only\", \"strict\"]\n",
        );
        let config = loader(None, Some(project)).load().unwrap();
        assert_eq!(config.backend.kind, BackendKind::LlamaCpp);
        assert_eq!(config.parser.order, [ParseStrategy::NameOnly, ParseStrategy::Strict]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "project.toml", "[backend]\ntimeout_secs = 0\n");
        assert!(loader(None, Some(project)).load().is_err());

        let project = write(&dir, "dup.toml", "[parser]\norder = [\"strict\", \"strict\"]\n");
        assert!(loader(None, Some(project)).load().is_err());

        let project = write(
            &dir,
            "res.toml",
            "[backend]\nkind = \"llama_cpp\"\n\n[residency]\nenabled = true\n",
        );
        assert!(loader(None, Some(project)).load().is_err());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let result = loader(None, None).with_explicit(dir.path().join("nope.toml")).load();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_strategy_names() {
        assert_eq!(parse_strategy("Thinking_JSON").unwrap(), ParseStrategy::ThinkingJson);
        assert!(parse_strategy("guess").is_err());
    }
}
