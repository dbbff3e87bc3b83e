//! Model residency: keeping only one model of a family loaded.
//!
//! On memory-constrained machines a second model of the same family can
//! evict the router model or fail to load. Before inference the router asks
//! its [`ModelResidency`] to make the target model the only resident member
//! of its family.

use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Capability to manage which models are loaded on the inference server.
#[async_trait]
pub trait ModelResidency: Send + Sync {
    /// Unload every other loaded model of `model_id`'s family.
    ///
    /// Returns the names of the models that were unloaded.
    async fn ensure_exclusive(&self, model_id: &str) -> Result<Vec<String>>;
}

/// Residency that never touches the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResidency;

#[async_trait]
impl ModelResidency for NoopResidency {
    async fn ensure_exclusive(&self, _model_id: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Residency backed by Ollama's `/api/ps` and `keep_alive: 0` unloading.
#[derive(Clone)]
pub struct OllamaResidency {
    base_url: String,
    client: Client,
    family: Option<String>,
}

impl OllamaResidency {
    /// Create a residency manager for the server in `config`.
    pub fn new(config: &LocalLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            family: None,
        })
    }

    /// Match family members by a case-insensitive marker (e.g. "qwen")
    /// instead of the name before the tag.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into().to_lowercase());
        self
    }

    /// Names of the currently loaded models.
    pub async fn running_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/ps", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::ProviderError(format!(
                "Failed to list running models: {}",
                response.status()
            )));
        }

        let ps: PsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(ps
            .models
            .into_iter()
            .map(|m| m.name)
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Unload one model immediately.
    pub async fn unload(&self, model: &str) -> Result<()> {
        let body = UnloadRequest {
            model,
            prompt: "",
            keep_alive: 0,
        };
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::ProviderError(format!(
                "Failed to unload {}: {}",
                model,
                response.status()
            )));
        }
        info!(model = %model, "Unloaded model");
        Ok(())
    }

    fn same_family(&self, target: &str, candidate: &str) -> bool {
        match &self.family {
            Some(marker) => {
                candidate.to_lowercase().contains(marker.as_str())
                    && target.to_lowercase().contains(marker.as_str())
            }
            None => family_of(candidate) == family_of(target),
        }
    }
}

/// Family of a model name: the part before the `:tag`.
pub fn family_of(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}

#[async_trait]
impl ModelResidency for OllamaResidency {
    async fn ensure_exclusive(&self, model_id: &str) -> Result<Vec<String>> {
        let running = self.running_models().await?;
        let mut unloaded = Vec::new();

        for name in running
            .iter()
            .filter(|name| name.as_str() != model_id && self.same_family(model_id, name))
        {
            match self.unload(name).await {
                Ok(()) => unloaded.push(name.clone()),
                Err(e) => warn!(model = %name, error = %e, "Failed to unload model"),
            }
        }

        debug!(target_model = %model_id, unloaded = unloaded.len(), "Residency ensured");
        Ok(unloaded)
    }
}

#[derive(Debug, Deserialize)]
struct PsResponse {
    #[serde(default)]
    models: Vec<PsModel>,
}

#[derive(Debug, Deserialize)]
struct PsModel {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
struct UnloadRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    keep_alive: u32,
}
