//! The routing façade
//!
//! One call per utterance: keyword gate, prompt encoding, model residency,
//! inference under a timeout, decoding, argument synthesis and
//! normalization. Inference failures never escape; they become a fallback
//! decision with zero elapsed time and no confidence.

use crate::config::{BackendKind, RouterConfig};
use crate::decision::{RoutingDecision, RoutingRequest};
use crate::error::Result;
use crate::gate::Gate;
use crate::normalize::{normalize_arguments, synthesize_arguments};
use callgrammar::{
    decode, encode_prompt, DecodeOptions, Decoded, FunctionCatalog, DEFAULT_STOP_SEQUENCES,
    GRAMMAR_VERSION,
};
use chrono::NaiveDate;
use llm::{
    collect_stream, GenerateRequest, Generation, InferenceBackend, LlamaCppClient, LocalLlmConfig,
    ModelResidency, NoopResidency, OllamaClient, OllamaResidency,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tooling::async_utils::timeout::{with_timeout, TimeoutError};
use tooling::logging::format_duration;
use tracing::{debug, info, warn};

/// Per-call generation settings
#[derive(Debug, Clone, PartialEq)]
pub struct RouterOptions {
    /// Deadline for one inference call
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
    pub seed: Option<u64>,
    pub stop: Vec<String>,
    /// Ask the backend for a chunk stream and accumulate it
    pub stream: bool,
    pub decode: DecodeOptions,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_tokens: 150,
            temperature: 0.0,
            seed: Some(42),
            stop: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
            stream: false,
            decode: DecodeOptions::default(),
        }
    }
}

impl RouterOptions {
    pub fn from_config(config: &RouterConfig) -> Self {
        let backend = &config.backend;
        Self {
            timeout: backend.timeout(),
            max_tokens: backend.max_tokens,
            temperature: backend.temperature,
            seed: backend.seed,
            stop: backend.stop.clone(),
            stream: backend.stream,
            decode: DecodeOptions::with_order(config.parser.order.clone()),
        }
    }

    fn request(&self, prompt: String) -> GenerateRequest {
        let request = GenerateRequest::new(prompt)
            .with_stop(self.stop.iter().cloned())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        match self.seed {
            Some(seed) => request.with_seed(seed),
            None => request,
        }
    }
}

/// Routes utterances to catalog functions
///
/// Built once by the composition root and shared behind an `Arc`; `route`
/// takes `&self` and keeps no per-call state.
pub struct Router {
    catalog: Arc<FunctionCatalog>,
    backend: Arc<dyn InferenceBackend>,
    residency: Arc<dyn ModelResidency>,
    gate: Gate,
    options: RouterOptions,
    today: Option<NaiveDate>,
}

impl Router {
    /// Router with the default gate, no residency management and default
    /// options
    pub fn new(catalog: Arc<FunctionCatalog>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            catalog,
            backend,
            residency: Arc::new(NoopResidency),
            gate: Gate::default(),
            options: RouterOptions::default(),
            today: None,
        }
    }

    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_residency(mut self, residency: Arc<dyn ModelResidency>) -> Self {
        self.residency = residency;
        self
    }

    pub fn with_options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    /// Pin the date relative dates resolve against
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Build the backend, residency and gate described by `config`
    pub fn from_config(config: &RouterConfig, catalog: Arc<FunctionCatalog>) -> Result<Self> {
        let backend_config = &config.backend;
        let mut llm_config = LocalLlmConfig::new(&backend_config.base_url, &backend_config.model)
            .with_timeout(backend_config.timeout());
        if let Some(keep_alive) = &backend_config.keep_alive {
            llm_config = llm_config.with_keep_alive(keep_alive);
        }

        let backend: Arc<dyn InferenceBackend> = match backend_config.kind {
            BackendKind::Ollama => Arc::new(OllamaClient::new(llm_config.clone())?),
            BackendKind::LlamaCpp => Arc::new(LlamaCppClient::new(llm_config.clone())?),
        };

        let residency: Arc<dyn ModelResidency> = if config.residency.enabled {
            let residency = OllamaResidency::new(&llm_config)?;
            match &config.residency.family {
                Some(family) => Arc::new(residency.with_family(family)),
                None => Arc::new(residency),
            }
        } else {
            Arc::new(NoopResidency)
        };

        let gate = if config.gate.enabled {
            Gate::new(&config.gate.keywords)
        } else {
            Gate::disabled()
        };

        info!(
            grammar_version = GRAMMAR_VERSION,
            backend = backend.name(),
            model = backend.model(),
            functions = catalog.len(),
            "Router ready"
        );

        Ok(Self::new(catalog, backend)
            .with_residency(residency)
            .with_gate(gate)
            .with_options(RouterOptions::from_config(config)))
    }

    pub fn catalog(&self) -> &Arc<FunctionCatalog> {
        &self.catalog
    }

    pub fn backend(&self) -> &Arc<dyn InferenceBackend> {
        &self.backend
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// The exact prompt `route` would send for `utterance`
    pub fn prompt(&self, utterance: &str) -> String {
        encode_prompt(&self.catalog, utterance)
    }

    /// Route one utterance against the router's catalog
    pub async fn route(&self, utterance: &str) -> RoutingDecision {
        let request = RoutingRequest::new(utterance, self.catalog.clone());
        self.route_request(&request).await
    }

    /// Route a prepared request; its catalog takes precedence over the
    /// router's
    pub async fn route_request(&self, request: &RoutingRequest) -> RoutingDecision {
        if self.gate.should_bypass(&request.utterance) {
            debug!(request_id = %request.id, utterance = %request.utterance, "Gate bypass");
            return RoutingDecision {
                bypassed: true,
                ..RoutingDecision::fallback(request)
            };
        }

        let prompt = encode_prompt(&request.catalog, &request.utterance);

        match self.residency.ensure_exclusive(self.backend.model()).await {
            Ok(unloaded) if !unloaded.is_empty() => {
                debug!(request_id = %request.id, unloaded = ?unloaded, "Unloaded sibling models");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "Residency check failed, routing anyway");
            }
        }

        let started = Instant::now();
        let outcome = with_timeout(self.options.timeout, self.generate(prompt)).await;
        let elapsed = started.elapsed();

        let raw = match outcome {
            Ok(generation) if !generation.is_empty() => generation.into_raw_text(),
            Ok(_) => {
                warn!(request_id = %request.id, backend = self.backend.name(), "Router model returned no text");
                return RoutingDecision::fallback(request);
            }
            Err(TimeoutError::Timeout(limit)) => {
                warn!(
                    request_id = %request.id,
                    timeout = %format_duration(limit),
                    "Router model timed out"
                );
                return RoutingDecision::fallback(request);
            }
            Err(TimeoutError::OperationFailed(e)) => {
                warn!(
                    request_id = %request.id,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Router model unavailable"
                );
                return RoutingDecision::fallback(request);
            }
        };

        debug!(request_id = %request.id, raw = %raw, "Router output");

        let decoded = resolve_call(
            &request.catalog,
            &request.utterance,
            &raw,
            &self.options.decode,
            self.today(),
        );

        info!(
            request_id = %request.id,
            function = %decoded.function_name,
            strategy = %decoded.strategy,
            confidence = ?decoded.confidence,
            elapsed = %format_duration(elapsed),
            "Routed utterance"
        );

        RoutingDecision {
            request_id: request.id,
            function_name: decoded.function_name,
            arguments: decoded.arguments,
            elapsed,
            strategy: decoded.strategy,
            confidence: decoded.confidence,
            bypassed: false,
        }
    }

    async fn generate(&self, prompt: String) -> llm::Result<Generation> {
        let request = self.options.request(prompt);
        if self.options.stream {
            let stream = self.backend.generate_stream(request).await?;
            collect_stream(stream).await
        } else {
            self.backend.generate(request).await
        }
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Decode raw router output and prepare its arguments for a skill
///
/// A call recovered without arguments gets them synthesized from the
/// utterance; every call then has its arguments normalized.
pub fn resolve_call(
    catalog: &FunctionCatalog,
    utterance: &str,
    raw: &str,
    options: &DecodeOptions,
    today: NaiveDate,
) -> Decoded {
    let mut decoded = decode(raw, catalog, Some(options));

    if decoded.needs_synthesis() {
        decoded.arguments = synthesize_arguments(&decoded.function_name, utterance);
        debug!(function = %decoded.function_name, "Synthesized arguments from utterance");
    }

    normalize_arguments(&decoded.function_name, &mut decoded.arguments, today);
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::default_catalog;
    use callgrammar::{Confidence, DecodeStrategy};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_resolve_strict_call_normalizes() {
        let catalog = default_catalog().unwrap();
        let decoded = resolve_call(
            &catalog,
            "set a timer for five minutes",
            "<start_function_call>call:set_timer{duration:<escape>5 minutes<escape>}<end_function_call>",
            &DecodeOptions::default(),
            today(),
        );
        assert_eq!(decoded.function_name, "set_timer");
        assert_eq!(decoded.confidence, Confidence::Clean);
        assert_eq!(decoded.arguments.get("seconds").and_then(|v| v.as_i64()), Some(300));
    }

    #[test]
    fn test_resolve_name_only_synthesizes() {
        let catalog = default_catalog().unwrap();
        let decoded = resolve_call(
            &catalog,
            "look up rust lifetimes",
            "I think web_search is right",
            &DecodeOptions::default(),
            today(),
        );
        assert_eq!(decoded.function_name, "web_search");
        assert_eq!(decoded.strategy, DecodeStrategy::NameOnly);
        assert_eq!(decoded.arguments.get_str("query"), Some("look up rust lifetimes"));
    }

    #[test]
    fn test_resolve_fallback_is_not_synthesized() {
        let catalog = default_catalog().unwrap();
        let decoded = resolve_call(&catalog, "hmm", "???", &DecodeOptions::default(), today());
        assert_eq!(decoded.strategy, DecodeStrategy::Fallback);
        assert_eq!(decoded.arguments.get("thinking").and_then(|v| v.as_bool()), Some(false));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = RouterConfig::default();
        config.backend.seed = None;
        config.backend.timeout_secs = 5;
        let options = RouterOptions::from_config(&config);
        assert_eq!(options.timeout, Duration::from_secs(5));
        let request = options.request("p".to_string());
        assert_eq!(request.seed, None);
        assert_eq!(request.max_tokens, 150);
        assert_eq!(request.stop, ["<end_of_turn>", "<start_function_response>"]);
    }
}
