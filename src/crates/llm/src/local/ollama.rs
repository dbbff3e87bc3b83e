//! Ollama client implementation.
//!
//! Uses `/api/generate` in raw mode so the prompt reaches the model exactly
//! as rendered, control tokens included.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{GenerateRequest, InferenceBackend, LocalLlmConfig};
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "functiongemma");
//! let client = OllamaClient::new(config)?;
//!
//! let generation = client.generate(GenerateRequest::new(prompt)).await?;
//! ```

use crate::backend::{
    line_stream, GenerateRequest, Generation, GenerationChunk, GenerationStream, InferenceBackend,
};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use crate::provider_utils::{ModelInfo, ProviderUtils};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ollama client for raw-prompt inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
    current_model: String,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let current_model = config.model.clone();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    /// Check if the Ollama server is running.
    pub async fn check_health(&self) -> Result<bool> {
        match self.client.get(self.config.endpoint("/api/tags")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn build_request(&self, request: &GenerateRequest, stream: bool) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: self.current_model.clone(),
            prompt: request.prompt.clone(),
            raw: true,
            stream,
            keep_alive: self.config.keep_alive.clone(),
            options: OllamaOptions {
                temperature: request.temperature,
                seed: request.seed,
                num_predict: request.max_tokens,
                stop: request.stop.clone(),
            },
        }
    }

    async fn post_generate(&self, body: &OllamaGenerateRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.config.endpoint("/api/generate"))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else if e.is_connect() {
                    LlmError::ServiceUnavailable(e.to_string())
                } else {
                    LlmError::HttpError(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotFound(body.model.clone()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ProviderError(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }
}

fn chunk_from_line(line: &str) -> Result<GenerationChunk> {
    let parsed: OllamaGenerateResponse = serde_json::from_str(line)?;
    if let Some(error) = parsed.error {
        return Err(LlmError::ProviderError(error));
    }
    Ok(GenerationChunk {
        text: parsed.response,
        thinking: parsed.thinking.filter(|t| !t.is_empty()),
        done: parsed.done,
    })
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation> {
        let body = self.build_request(&request, false);
        let response = self.post_generate(&body).await?;

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(LlmError::ProviderError(error));
        }

        debug!(
            model = %parsed.model,
            eval_count = parsed.eval_count.unwrap_or(0),
            total_duration_ns = parsed.total_duration.unwrap_or(0),
            "Ollama generation finished"
        );

        Ok(Generation {
            text: parsed.response,
            thinking: parsed.thinking.filter(|t| !t.is_empty()),
        })
    }

    async fn generate_stream(&self, request: GenerateRequest) -> Result<GenerationStream> {
        let body = self.build_request(&request, true);
        let response = self.post_generate(&body).await?;

        let chunks = line_stream(response.bytes_stream())
            .map(|line| line.and_then(|l| chunk_from_line(&l)));
        Ok(chunks.boxed())
    }

    fn model(&self) -> &str {
        &self.current_model
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    raw: bool,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    num_predict: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    thinking: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    eval_count: Option<usize>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl ProviderUtils for OllamaClient {
    async fn ping(&self) -> Result<bool> {
        self.check_health().await
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self.client.get(self.config.endpoint("/api/tags")).send().await?;

        if !response.status().is_success() {
            return Err(LlmError::ProviderError(
                "Failed to fetch models from Ollama".to_string(),
            ));
        }

        #[derive(Deserialize)]
        struct OllamaModelsResponse {
            models: Vec<OllamaModelInfo>,
        }

        #[derive(Deserialize)]
        struct OllamaModelInfo {
            name: String,
            #[serde(default)]
            size: Option<u64>,
            #[serde(default)]
            modified_at: Option<String>,
        }

        let models_response: OllamaModelsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let models = models_response
            .models
            .into_iter()
            .map(|m| {
                let mut info = ModelInfo::new(&m.name);
                if let Some(size_gb) = m
                    .size
                    .and_then(|size| serde_json::Number::from_f64(size as f64 / 1_000_000_000.0))
                {
                    info.metadata
                        .insert("size_gb".to_string(), serde_json::Value::Number(size_gb));
                }
                if let Some(modified) = m.modified_at {
                    info.metadata
                        .insert("modified_at".to_string(), serde_json::Value::String(modified));
                }
                info
            })
            .collect();

        Ok(models)
    }

    async fn use_model(&mut self, model: impl Into<String> + Send) -> Result<String> {
        let model = model.into();
        self.current_model = model.clone();
        self.config.model = model.clone();
        Ok(model)
    }

    fn current_model(&self) -> &str {
        &self.current_model
    }
}
