//! Training examples for the router model
//!
//! Examples are rendered with the same encoder the router uses at inference
//! time, so a prompt seen in training is byte-identical to the prompt seen in
//! production. Each example records the grammar version it was written with.

use crate::error::{Result, RouterError};
use callgrammar::{encode_call, encode_prompt, Arguments, FunctionCatalog, GRAMMAR_VERSION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use tooling::logging::{LogGuard, LogLevel};
use tracing::warn;

/// An utterance with the call the router should produce for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUtterance {
    pub utterance: String,
    pub function: String,
    #[serde(default)]
    pub arguments: Arguments,
}

/// One prompt/completion pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub grammar_version: u32,
    pub function: String,
    pub prompt: String,
    pub completion: String,
}

impl TrainingExample {
    /// Prompt and completion joined, for trainers that take a single text
    /// field
    pub fn text(&self) -> String {
        format!("{}{}", self.prompt, self.completion)
    }
}

/// Render one labeled utterance
pub fn encode_example(catalog: &FunctionCatalog, labeled: &LabeledUtterance) -> TrainingExample {
    TrainingExample {
        grammar_version: GRAMMAR_VERSION,
        function: labeled.function.clone(),
        prompt: encode_prompt(catalog, &labeled.utterance),
        completion: encode_call(&labeled.function, &labeled.arguments),
    }
}

/// Problems with one labeled utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleIssue {
    /// The function is not in the catalog; the example is skipped
    UnknownFunction(String),
    MissingRequired { function: String, parameter: String },
    UndeclaredArgument { function: String, parameter: String },
}

impl ExampleIssue {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExampleIssue::UnknownFunction(_))
    }
}

impl std::fmt::Display for ExampleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExampleIssue::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            ExampleIssue::MissingRequired { function, parameter } => {
                write!(f, "{} is missing required argument '{}'", function, parameter)
            }
            ExampleIssue::UndeclaredArgument { function, parameter } => {
                write!(f, "{} has undeclared argument '{}'", function, parameter)
            }
        }
    }
}

/// Check a labeled utterance against the catalog
pub fn validate_example(catalog: &FunctionCatalog, labeled: &LabeledUtterance) -> Vec<ExampleIssue> {
    let spec = match catalog.get(&labeled.function) {
        Ok(spec) => spec,
        Err(_) => return vec![ExampleIssue::UnknownFunction(labeled.function.clone())],
    };

    let missing = spec
        .required()
        .iter()
        .filter(|r| !labeled.arguments.contains_key(r))
        .map(|r| ExampleIssue::MissingRequired {
            function: spec.name().to_string(),
            parameter: r.clone(),
        });

    let undeclared = labeled
        .arguments
        .keys()
        .filter(|k| !spec.has_parameter(k))
        .map(|k| ExampleIssue::UndeclaredArgument {
            function: spec.name().to_string(),
            parameter: k.to_string(),
        });

    missing.chain(undeclared).collect()
}

/// Outcome of [`build_examples`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub total: usize,
    pub skipped: usize,
    pub warnings: usize,
    /// Encoded examples per function
    pub counts: BTreeMap<String, usize>,
}

impl ValidationReport {
    pub fn encoded(&self) -> usize {
        self.total - self.skipped
    }
}

/// Validate and encode a batch
///
/// Examples naming an unknown function are skipped. Other issues are
/// logged and counted but the example is kept.
pub fn build_examples(
    catalog: &FunctionCatalog,
    labeled: &[LabeledUtterance],
) -> (Vec<TrainingExample>, ValidationReport) {
    let _guard = LogGuard::with_level("build_examples", LogLevel::Info);
    let mut report = ValidationReport {
        total: labeled.len(),
        ..Default::default()
    };
    let mut examples = Vec::with_capacity(labeled.len());

    for (index, item) in labeled.iter().enumerate() {
        let issues = validate_example(catalog, item);
        for issue in &issues {
            warn!(example = index + 1, utterance = %item.utterance, "{}", issue);
        }

        if issues.iter().any(ExampleIssue::is_fatal) {
            report.skipped += 1;
            continue;
        }

        report.warnings += issues.len();
        *report.counts.entry(item.function.clone()).or_default() += 1;
        examples.push(encode_example(catalog, item));
    }

    (examples, report)
}

/// Read one JSON value per non-blank line
pub fn read_jsonl<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>> {
    let mut items = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| RouterError::Training {
            line: index + 1,
            message: e.to_string(),
        })?;
        items.push(item);
    }
    Ok(items)
}

/// Write one JSON value per line
pub fn write_jsonl<T: Serialize>(mut writer: impl Write, items: &[T]) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
