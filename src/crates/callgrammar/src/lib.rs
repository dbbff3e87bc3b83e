//! callgrammar - control-token function-calling grammar
//!
//! Encodes a catalog of function declarations into the prompt grammar a small
//! router model was fine-tuned on, and decodes the model's raw output back
//! into a function name and arguments.
//!
//! # Example
//!
//! ```rust
//! use callgrammar::{decode, encode_prompt, Arguments, Fallback, FunctionCatalog, FunctionSpec, ParamType};
//!
//! let catalog = FunctionCatalog::new(
//!     vec![
//!         FunctionSpec::builder("set_timer", "Sets a countdown timer")
//!             .param("duration", ParamType::String, "Timer duration")
//!             .required("duration")
//!             .build(),
//!         FunctionSpec::builder("passthrough", "Routes to the chat model")
//!             .param("thinking", ParamType::Boolean, "Complex reasoning")
//!             .build(),
//!     ],
//!     Fallback::new("passthrough", Arguments::new().with("thinking", false)),
//! )
//! .unwrap();
//!
//! let prompt = encode_prompt(&catalog, "set a timer for 5 minutes");
//! assert!(prompt.ends_with("<start_of_turn>model"));
//!
//! let decoded = decode(
//!     "<start_function_call>call:set_timer{duration:<escape>5 minutes<escape>}<end_function_call>",
//!     &catalog,
//!     None,
//! );
//! assert_eq!(decoded.function_name, "set_timer");
//! assert_eq!(decoded.arguments.get_str("duration"), Some("5 minutes"));
//! ```

pub mod catalog;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod shared;
pub mod types;

pub use catalog::{Fallback, FunctionCatalog, FunctionSpec, FunctionSpecBuilder, ParameterSpec};
pub use constants::{DEFAULT_STOP_SEQUENCES, GRAMMAR_VERSION};
pub use decode::{Confidence, DecodeOptions, DecodeStrategy, Decoded, ParseStrategy};
pub use encode::{encode_call, encode_declaration, encode_declarations, encode_prompt};
pub use types::{ArgValue, Arguments, GrammarError, GrammarResult, ParamType};

/// Decode raw router output against `catalog`
///
/// Uses the default strategy order when `options` is `None`. Always returns a
/// call; see [`DecodeStrategy`] for how it was obtained.
pub fn decode(raw: &str, catalog: &FunctionCatalog, options: Option<&DecodeOptions>) -> Decoded {
    match options {
        Some(options) => decode::decode_with(raw, catalog, options),
        None => decode::decode_with(raw, catalog, &DecodeOptions::default()),
    }
}
