//! Layered decoding of raw router output

use crate::catalog::FunctionCatalog;
use crate::decode::json_action::extract_action_object;
use crate::decode::scanner::{find_catalog_name, find_strict_call, split_thinking, ScannedCall};
use crate::types::Arguments;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A configurable recovery step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// `call:NAME{...}`, first on the full text, then with reasoning stripped
    Strict,
    /// Flat JSON object with an `"action"` key inside the reasoning spans
    ThinkingJson,
    /// Any catalog name anywhere in the text
    NameOnly,
}

/// The step that actually produced a decoded call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    Strict,
    StrictStripped,
    ThinkingJson,
    NameOnly,
    Fallback,
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeStrategy::Strict => "strict",
            DecodeStrategy::StrictStripped => "strict_stripped",
            DecodeStrategy::ThinkingJson => "thinking_json",
            DecodeStrategy::NameOnly => "name_only",
            DecodeStrategy::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// How much the decoded call can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    None,
    Guessed,
    Recovered,
    Clean,
}

impl DecodeStrategy {
    pub fn confidence(&self) -> Confidence {
        match self {
            DecodeStrategy::Strict => Confidence::Clean,
            DecodeStrategy::StrictStripped | DecodeStrategy::ThinkingJson => Confidence::Recovered,
            DecodeStrategy::NameOnly => Confidence::Guessed,
            DecodeStrategy::Fallback => Confidence::None,
        }
    }
}

/// Options for [`decode`](crate::decode())
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Strategies tried in order; the fallback always runs last
    pub order: Vec<ParseStrategy>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            order: vec![
                ParseStrategy::Strict,
                ParseStrategy::ThinkingJson,
                ParseStrategy::NameOnly,
            ],
        }
    }
}

impl DecodeOptions {
    pub fn with_order(order: Vec<ParseStrategy>) -> Self {
        Self { order }
    }
}

/// Result of decoding raw router output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub function_name: String,
    pub arguments: Arguments,
    pub strategy: DecodeStrategy,
    pub confidence: Confidence,
}

impl Decoded {
    fn new(function_name: String, arguments: Arguments, strategy: DecodeStrategy) -> Self {
        Self {
            function_name,
            arguments,
            confidence: strategy.confidence(),
            strategy,
        }
    }

    fn from_scan(call: ScannedCall, strategy: DecodeStrategy) -> Self {
        let arguments = call.block.map(|b| b.arguments).unwrap_or_default();
        Self::new(call.name, arguments, strategy)
    }

    /// The catalog fallback with its default arguments
    pub fn fallback(catalog: &FunctionCatalog) -> Self {
        let fallback = catalog.fallback();
        Self::new(
            fallback.name.clone(),
            fallback.arguments.clone(),
            DecodeStrategy::Fallback,
        )
    }

    /// True when a function was recovered but no argument came with it
    pub fn needs_synthesis(&self) -> bool {
        self.arguments.is_empty() && self.strategy != DecodeStrategy::Fallback
    }
}

/// Decode raw output into a call against `catalog`
///
/// Never fails: output nothing can be recovered from resolves to the catalog
/// fallback.
pub fn decode_with(raw: &str, catalog: &FunctionCatalog, options: &DecodeOptions) -> Decoded {
    let split = split_thinking(raw);

    for step in &options.order {
        let found = match step {
            ParseStrategy::Strict => find_strict_call(raw, catalog)
                .map(|c| Decoded::from_scan(c, DecodeStrategy::Strict))
                .or_else(|| {
                    if !split.has_thinking() {
                        return None;
                    }
                    find_strict_call(&split.content, catalog)
                        .map(|c| Decoded::from_scan(c, DecodeStrategy::StrictStripped))
                }),
            ParseStrategy::ThinkingJson => split.thinking.iter().find_map(|span| {
                extract_action_object(span, catalog)
                    .map(|c| Decoded::new(c.name, c.arguments, DecodeStrategy::ThinkingJson))
            }),
            ParseStrategy::NameOnly => find_catalog_name(raw, catalog)
                .map(|c| Decoded::from_scan(c, DecodeStrategy::NameOnly)),
        };

        if let Some(decoded) = found {
            debug!(
                strategy = %decoded.strategy,
                function = %decoded.function_name,
                args = decoded.arguments.len(),
                "Decoded router output"
            );
            return decoded;
        }
    }

    debug!(raw_len = raw.len(), "No call recovered, using fallback");
    Decoded::fallback(catalog)
}
