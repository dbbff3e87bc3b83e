//! Argument block parsing and value coercion

use crate::constants::{CLOSE_BRACE, COLON, COMMA, ESCAPE, FALSE_LITERAL, TRUE_LITERAL};
use crate::shared::{read_escaped, scan_identifier};
use crate::types::{ArgValue, Arguments};

/// Arguments read from the inside of a `{...}` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBlock {
    pub arguments: Arguments,
    /// Whether the closing brace was reached
    pub closed: bool,
}

/// Parse `key:<escape>value<escape>,...}` starting just after the opening brace
///
/// Escaped values may contain commas and braces. Bare `key:value` pairs are
/// accepted up to the next `,`, `}` or `<`. Separators between pairs are
/// optional, so `a:<escape>x<escape> b:<escape>y<escape>` yields both pairs.
/// Parsing stops at the first malformed or truncated pair; pairs read before
/// it are kept.
pub fn parse_argument_block(input: &str) -> ArgumentBlock {
    let mut block = ArgumentBlock::default();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(|c: char| c == COMMA || c.is_whitespace());

        if rest.starts_with(CLOSE_BRACE) {
            block.closed = true;
            return block;
        }

        let Some((key, after_key)) = scan_identifier(rest) else {
            return block;
        };
        let Some(after_colon) = after_key.trim_start().strip_prefix(COLON) else {
            return block;
        };
        let after_colon = after_colon.trim_start();

        let (raw, remainder) = if after_colon.starts_with(ESCAPE) {
            match read_escaped(after_colon) {
                Some(pair) => pair,
                None => return block,
            }
        } else {
            match after_colon.find(|c: char| c == COMMA || c == CLOSE_BRACE || c == '<') {
                Some(end) => (after_colon[..end].trim(), &after_colon[end..]),
                None => return block,
            }
        };

        block.arguments.insert(key, coerce_value(raw));
        rest = remainder;
    }
}

/// Coerce a raw argument string
///
/// Digit-only strings become integers (when they fit), `true`/`false` in any
/// case become booleans, everything else is kept verbatim.
pub fn coerce_value(raw: &str) -> ArgValue {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<i64>() {
            return ArgValue::Integer(n);
        }
    }
    if raw.eq_ignore_ascii_case(TRUE_LITERAL) {
        return ArgValue::Boolean(true);
    }
    if raw.eq_ignore_ascii_case(FALSE_LITERAL) {
        return ArgValue::Boolean(false);
    }
    ArgValue::String(raw.to_string())
}
