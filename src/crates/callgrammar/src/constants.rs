//! Control tokens and fixed text of the function-calling grammar
//!
//! Any change to a marker or to the escape delimiter changes the wire format the
//! router model was trained on and must bump [`GRAMMAR_VERSION`].

/// Version of the textual grammar produced by the encoder and expected by the decoder.
pub const GRAMMAR_VERSION: u32 = 1;

// Escape delimiter wrapping free-text values
pub const ESCAPE: &str = "<escape>";

// Turn markers
pub const START_OF_TURN: &str = "<start_of_turn>";
pub const END_OF_TURN: &str = "<end_of_turn>";

// Declaration markers
pub const START_DECLARATION: &str = "<start_function_declaration>";
pub const END_DECLARATION: &str = "<end_function_declaration>";
pub const DECLARATION_PREFIX: &str = "declaration:";

// Call markers
pub const START_CALL: &str = "<start_function_call>";
pub const END_CALL: &str = "<end_function_call>";
pub const CALL_PREFIX: &str = "call:";
pub const START_RESPONSE: &str = "<start_function_response>";

// Reasoning channel markers
pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

// Structural characters
pub const COMMA: char = ',';
pub const COLON: char = ':';
pub const OPEN_BRACE: char = '{';
pub const CLOSE_BRACE: char = '}';
pub const OPEN_BRACKET: char = '[';
pub const CLOSE_BRACKET: char = ']';

// Literals
pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";
pub const OBJECT_TYPE: &str = "OBJECT";

/// Roles used in turn markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Developer,
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Fixed developer message that precedes the declarations.
pub const SYSTEM_MESSAGE: &str =
    "You are a model that can do function calling with the following functions";

/// Stop sequences that end a router generation.
pub const DEFAULT_STOP_SEQUENCES: [&str; 2] = [END_OF_TURN, START_RESPONSE];
