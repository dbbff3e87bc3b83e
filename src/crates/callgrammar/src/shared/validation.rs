//! Identifier validation and scanning

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Checks if a name is a valid function or parameter identifier
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Splits the longest identifier off the front of `input`
///
/// Returns `None` when `input` does not start with an identifier character.
pub fn scan_identifier(input: &str) -> Option<(&str, &str)> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    Some((&input[..end], &input[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("control_light"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("set timer"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_scan_identifier() {
        assert_eq!(scan_identifier("web_search{q"), Some(("web_search", "{q")));
        assert_eq!(scan_identifier("room"), Some(("room", "")));
        assert_eq!(scan_identifier("{x}"), None);
        assert_eq!(scan_identifier(""), None);
    }
}
