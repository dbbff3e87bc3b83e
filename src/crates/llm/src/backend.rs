//! The raw-prompt inference seam.
//!
//! The router never talks chat messages to its model: it sends one fully
//! rendered prompt and reads back the raw completion, control tokens
//! included. [`InferenceBackend`] is that contract.

use crate::error::{LlmError, Result};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};

/// A single raw-prompt generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub stop: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub seed: Option<u64>,
}

impl GenerateRequest {
    /// Greedy request with no stop sequences and a 150 token budget.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            stop: Vec::new(),
            temperature: 0.0,
            max_tokens: 150,
            seed: None,
        }
    }

    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Completed generation.
///
/// `thinking` carries a separate reasoning channel for servers that split it
/// out of the main text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub thinking: Option<String>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            thinking: None,
        }
    }

    pub fn with_thinking(mut self, thinking: impl Into<String>) -> Self {
        self.thinking = Some(thinking.into());
        self
    }

    /// True when neither channel carries any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
            && self.thinking.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    /// Single text with the reasoning channel wrapped in `<think>` markers
    /// ahead of the content.
    pub fn into_raw_text(self) -> String {
        match self.thinking {
            Some(thinking) if !thinking.is_empty() => {
                format!("<think>{}</think>{}", thinking, self.text)
            }
            _ => self.text,
        }
    }
}

/// One incremental piece of a streamed generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationChunk {
    pub text: String,
    pub thinking: Option<String>,
    /// Set on the final chunk.
    pub done: bool,
}

/// Stream of generation chunks.
pub type GenerationStream = BoxStream<'static, Result<GenerationChunk>>;

/// A server that turns a raw prompt into raw text.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Run one generation to completion.
    async fn generate(&self, request: GenerateRequest) -> Result<Generation>;

    /// Run one generation, yielding chunks as they arrive.
    ///
    /// The default implementation yields the whole generation as a single
    /// final chunk.
    async fn generate_stream(&self, request: GenerateRequest) -> Result<GenerationStream> {
        let generation = self.generate(request).await?;
        let chunk = GenerationChunk {
            text: generation.text,
            thinking: generation.thinking,
            done: true,
        };
        Ok(stream::once(async move { Ok(chunk) }).boxed())
    }

    /// Model identifier used for logging and residency.
    fn model(&self) -> &str;

    /// Short backend name (e.g. "ollama").
    fn name(&self) -> &'static str;
}

/// Accumulate a chunk stream until its final chunk (or its end).
pub async fn collect_stream(mut stream: GenerationStream) -> Result<Generation> {
    let mut text = String::new();
    let mut thinking = String::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        text.push_str(&chunk.text);
        if let Some(t) = chunk.thinking {
            thinking.push_str(&t);
        }
        if chunk.done {
            break;
        }
    }

    Ok(Generation {
        text,
        thinking: (!thinking.is_empty()).then_some(thinking),
    })
}

/// Split a byte stream into complete text lines.
///
/// Blank lines are skipped; a trailing line without a newline is emitted
/// when the stream ends. A transport error ends the stream after it is
/// yielded.
pub(crate) fn line_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LlmError> + Send + 'static,
{
    struct State<S> {
        inner: std::pin::Pin<Box<S>>,
        buffer: Vec<u8>,
        finished: bool,
    }

    let state = State {
        inner: Box::pin(bytes),
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(pos) = st.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = st.buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line).trim().to_string();
                if line.is_empty() {
                    continue;
                }
                return Some((Ok(line), st));
            }

            if st.finished {
                let rest = std::mem::take(&mut st.buffer);
                let line = String::from_utf8_lossy(&rest).trim().to_string();
                return (!line.is_empty()).then(|| (Ok(line), st));
            }

            match st.inner.next().await {
                Some(Ok(bytes)) => st.buffer.extend_from_slice(bytes.as_ref()),
                Some(Err(err)) => {
                    st.finished = true;
                    st.buffer.clear();
                    let item: Result<String> = Err(err.into());
                    return Some((item, st));
                }
                None => st.finished = true,
            }
        }
    })
}
