//! Common test utilities: scripted inference backends and residency

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use llm::{
    GenerateRequest, Generation, GenerationChunk, GenerationStream, InferenceBackend, LlmError,
    ModelResidency,
};
use skill_router::{default_catalog, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock does when asked to generate
#[derive(Clone)]
pub enum Reply {
    Text(Generation),
    Fail(String),
    Hang(Duration),
}

/// Mock backend returning a scripted reply and recording requests
pub struct MockBackend {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockBackend {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(Generation::new(text)))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn generate(&self, request: GenerateRequest) -> llm::Result<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        match &self.reply {
            Reply::Text(generation) => Ok(generation.clone()),
            Reply::Fail(message) => Err(LlmError::ServiceUnavailable(message.clone())),
            Reply::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Generation::new("call:web_search{query:<escape>late<escape>}"))
            }
        }
    }

    async fn generate_stream(&self, request: GenerateRequest) -> llm::Result<GenerationStream> {
        let generation = self.generate(request).await?;

        // Split the text in two so accumulation is exercised
        let mid = generation
            .text
            .char_indices()
            .nth(generation.text.chars().count() / 2)
            .map_or(0, |(i, _)| i);
        let (head, tail) = generation.text.split_at(mid);
        let chunks = vec![
            Ok(GenerationChunk {
                text: head.to_string(),
                thinking: generation.thinking.clone(),
                done: false,
            }),
            Ok(GenerationChunk {
                text: tail.to_string(),
                thinking: None,
                done: true,
            }),
        ];
        Ok(stream::iter(chunks).boxed())
    }

    fn model(&self) -> &str {
        "functiongemma:270m"
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Residency that records the models it was asked about
#[derive(Default)]
pub struct RecordingResidency {
    pub fail: bool,
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ModelResidency for RecordingResidency {
    async fn ensure_exclusive(&self, model_id: &str) -> llm::Result<Vec<String>> {
        self.seen.lock().unwrap().push(model_id.to_string());
        if self.fail {
            return Err(LlmError::ServiceUnavailable("ps failed".to_string()));
        }
        Ok(vec!["functiongemma:old".to_string()])
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Router over the built-in catalog and a mock backend
pub fn router(backend: Arc<MockBackend>) -> Router {
    let catalog = Arc::new(default_catalog().expect("built-in catalog is valid"));
    Router::new(catalog, backend).with_today(today())
}
