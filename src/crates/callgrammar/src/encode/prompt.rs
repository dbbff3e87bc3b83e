//! Full prompt encoding

use crate::catalog::FunctionCatalog;
use crate::constants::{Role, END_OF_TURN, START_OF_TURN, SYSTEM_MESSAGE};
use crate::encode::declarations::encode_declarations;

/// Encode a complete router prompt: developer declarations, the user turn and
/// an open model turn.
///
/// The output is byte-identical for identical inputs; the same function is
/// used for inference and for training examples.
pub fn encode_prompt(catalog: &FunctionCatalog, utterance: &str) -> String {
    let developer = format!("{}{}", SYSTEM_MESSAGE, encode_declarations(catalog));

    let mut prompt = String::new();
    prompt.push_str(&encode_turn(Role::Developer, &developer));
    prompt.push('\n');
    prompt.push_str(&encode_turn(Role::User, utterance));
    prompt.push('\n');
    prompt.push_str(&open_turn(Role::Model));
    prompt
}

/// `<start_of_turn>ROLE CONTENT<end_of_turn>`
pub fn encode_turn(role: Role, content: &str) -> String {
    format!("{} {}{}", open_turn(role), content, END_OF_TURN)
}

/// `<start_of_turn>ROLE` with no content, signalling where generation begins
pub fn open_turn(role: Role) -> String {
    format!("{}{}", START_OF_TURN, role.as_str())
}
