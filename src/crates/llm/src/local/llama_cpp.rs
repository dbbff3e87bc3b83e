//! llama.cpp server client implementation.
//!
//! Talks to the native `/completion` endpoint, which takes a raw prompt and
//! applies no chat template. Streaming responses are server-sent events.

use crate::backend::{
    line_stream, GenerateRequest, Generation, GenerationChunk, GenerationStream, InferenceBackend,
};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SSE_DATA_PREFIX: &str = "data:";

/// llama.cpp server client for raw-prompt inference.
#[derive(Clone)]
pub struct LlamaCppClient {
    config: LocalLlmConfig,
    client: Client,
    current_model: String,
}

impl LlamaCppClient {
    /// Create a new llama.cpp client with the given configuration.
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

    /// Check if the llama.cpp server is running.
    pub async fn check_health(&self) -> Result<bool> {
        match self.client.get(self.config.endpoint("/health")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn build_request(request: &GenerateRequest, stream: bool) -> CompletionRequest {
        CompletionRequest {
            prompt: request.prompt.clone(),
            n_predict: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop.clone(),
            seed: request.seed,
            stream,
        }
    }

    async fn post_completion(&self, body: &CompletionRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.config.endpoint("/completion"))
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

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ProviderError(format!(
                "llama.cpp API error {}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }
}

/// Parse one SSE line; lines other than `data:` events yield `None`.
fn chunk_from_event(line: &str) -> Option<Result<GenerationChunk>> {
    let payload = line.strip_prefix(SSE_DATA_PREFIX)?.trim();
    let parsed = match serde_json::from_str::<CompletionResponse>(payload) {
        Ok(parsed) => parsed,
        Err(e) => return Some(Err(e.into())),
    };
    Some(Ok(GenerationChunk {
        text: parsed.content,
        thinking: None,
        done: parsed.stop,
    }))
}

#[async_trait]
impl InferenceBackend for LlamaCppClient {
    async fn generate(&self, request: GenerateRequest) -> Result<Generation> {
        let body = Self::build_request(&request, false);
        let response = self.post_completion(&body).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        debug!(
            tokens_predicted = parsed.tokens_predicted.unwrap_or(0),
            stopping_word = parsed.stopping_word.as_deref().unwrap_or(""),
            "llama.cpp completion finished"
        );

        Ok(Generation::new(parsed.content))
    }

    async fn generate_stream(&self, request: GenerateRequest) -> Result<GenerationStream> {
        let body = Self::build_request(&request, true);
        let response = self.post_completion(&body).await?;

        let chunks = line_stream(response.bytes_stream()).filter_map(|line| async move {
            match line {
                Ok(l) => chunk_from_event(&l),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(chunks.boxed())
    }

    fn model(&self) -> &str {
        &self.current_model
    }

    fn name(&self) -> &'static str {
        "llama_cpp"
    }
}

// llama.cpp native completion API types
#[derive(Debug, Serialize)]
struct CompletionRequest {
    prompt: String,
    n_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    stop: bool,
    #[serde(default)]
    tokens_predicted: Option<usize>,
    #[serde(default)]
    stopping_word: Option<String>,
}

// llama.cpp serves a single model, so model listing reports the configured one.
crate::impl_basic_provider_utils!(LlamaCppClient, config, current_model);
