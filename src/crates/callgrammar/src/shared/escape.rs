//! Escape delimiter helpers

use crate::constants::ESCAPE;

/// Wrap a free-text value in escape delimiters
pub fn escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + ESCAPE.len() * 2);
    result.push_str(ESCAPE);
    result.push_str(value);
    result.push_str(ESCAPE);
    result
}

/// Checks whether a text field would corrupt the grammar if escaped
pub fn contains_delimiter(value: &str) -> bool {
    value.contains(ESCAPE)
}

/// Reads an escaped value at the start of `input`
///
/// Returns the inner text and the remainder after the closing delimiter, or
/// `None` when `input` does not open with a delimiter or the value is unterminated.
pub fn read_escaped(input: &str) -> Option<(&str, &str)> {
    let body = input.strip_prefix(ESCAPE)?;
    let end = body.find(ESCAPE)?;
    Some((&body[..end], &body[end + ESCAPE.len()..]))
}
