//! Connection testing and model management for inference servers.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A model the server can run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier/name.
    pub id: String,

    /// Additional server-reported metadata (size, modification time).
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// Health and model management shared by every local server client.
#[async_trait]
pub trait ProviderUtils: Send + Sync {
    /// Ping the server.
    ///
    /// Returns `Ok(false)` when it is unreachable rather than an error.
    ///
    /// ```rust,ignore
    /// use llm::provider_utils::ProviderUtils;
    ///
    /// if !client.ping().await? {
    ///     eprintln!("router model server is down");
    /// }
    /// ```
    async fn ping(&self) -> Result<bool>;

    /// List the models the server knows about.
    async fn fetch_models(&self) -> Result<Vec<ModelInfo>>;

    /// Switch the model used by this client; returns the now active model.
    async fn use_model(&mut self, model: impl Into<String> + Send) -> Result<String>;

    /// Currently active model.
    fn current_model(&self) -> &str;
}
