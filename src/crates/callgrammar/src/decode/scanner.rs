//! Text scanning for call patterns and reasoning spans

use crate::catalog::FunctionCatalog;
use crate::constants::{CALL_PREFIX, OPEN_BRACE, THINK_CLOSE, THINK_OPEN};
use crate::decode::arguments::{parse_argument_block, ArgumentBlock};
use crate::shared::scan_identifier;

/// Raw output separated into its content and reasoning channels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSplit {
    /// Text outside every reasoning span
    pub content: String,
    /// Text of each reasoning span, in order
    pub thinking: Vec<String>,
}

impl ChannelSplit {
    pub fn has_thinking(&self) -> bool {
        !self.thinking.is_empty()
    }
}

/// Split `<think>…</think>` spans out of raw output
///
/// An unterminated `<think>` runs to the end of the text. A `</think>` with
/// no opening marker closes a span that started at the beginning of the text,
/// which is how some backends render a reasoning prefix.
pub fn split_thinking(text: &str) -> ChannelSplit {
    let mut split = ChannelSplit::default();
    let mut rest = text;

    if let Some(close) = rest.find(THINK_CLOSE) {
        let open = rest.find(THINK_OPEN);
        if open.map_or(true, |o| o > close) {
            split.thinking.push(rest[..close].to_string());
            rest = &rest[close + THINK_CLOSE.len()..];
        }
    }

    while let Some(open) = rest.find(THINK_OPEN) {
        split.content.push_str(&rest[..open]);
        let inner = &rest[open + THINK_OPEN.len()..];
        match inner.find(THINK_CLOSE) {
            Some(close) => {
                split.thinking.push(inner[..close].to_string());
                rest = &inner[close + THINK_CLOSE.len()..];
            }
            None => {
                split.thinking.push(inner.to_string());
                rest = "";
            }
        }
    }
    split.content.push_str(rest);
    split
}

/// A call recovered from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCall {
    pub name: String,
    pub block: Option<ArgumentBlock>,
}

/// Find the first `call:NAME{` whose NAME is in the catalog
pub fn find_strict_call(text: &str, catalog: &FunctionCatalog) -> Option<ScannedCall> {
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(CALL_PREFIX) {
        let after = &text[offset + pos + CALL_PREFIX.len()..];
        if let Some((name, rest)) = scan_identifier(after) {
            if catalog.contains(name) {
                if let Some(body) = rest.trim_start().strip_prefix(OPEN_BRACE) {
                    return Some(ScannedCall {
                        name: name.to_string(),
                        block: Some(parse_argument_block(body)),
                    });
                }
            }
        }
        offset += pos + CALL_PREFIX.len();
    }
    None
}

/// Find the first catalog name, in catalog order, occurring anywhere in `text`
///
/// When the occurrence is directly followed by an argument block it is parsed
/// as well.
pub fn find_catalog_name(text: &str, catalog: &FunctionCatalog) -> Option<ScannedCall> {
    for name in catalog.names() {
        let mut first = None;
        for (pos, _) in text.match_indices(name) {
            let rest = &text[pos + name.len()..];
            if let Some(body) = rest.trim_start().strip_prefix(OPEN_BRACE) {
                return Some(ScannedCall {
                    name: name.to_string(),
                    block: Some(parse_argument_block(body)),
                });
            }
            first.get_or_insert(pos);
        }
        if first.is_some() {
            return Some(ScannedCall {
                name: name.to_string(),
                block: None,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fallback, FunctionSpec};
    use crate::types::{Arguments, ParamType};

    fn catalog() -> FunctionCatalog {
        FunctionCatalog::new(
            vec![
                FunctionSpec::builder("web_search", "Search")
                    .param("query", ParamType::String, "q")
                    .build(),
                FunctionSpec::builder("passthrough", "Chat")
                    .param("thinking", ParamType::Boolean, "t")
                    .build(),
            ],
            Fallback::new("passthrough", Arguments::new().with("thinking", false)),
        )
        .unwrap()
    }

    #[test]
    fn test_split_thinking_closed_span() {
        let split = split_thinking("<think>plan</think>call:x{}");
        assert_eq!(split.content, "call:x{}");
        assert_eq!(split.thinking, vec!["plan"]);
    }

    #[test]
    fn test_split_thinking_unterminated() {
        let split = split_thinking("before<think>still going");
        assert_eq!(split.content, "before");
        assert_eq!(split.thinking, vec!["still going"]);
    }

    #[test]
    fn test_split_thinking_missing_open_marker() {
        let split = split_thinking("reasoning here</think>answer");
        assert_eq!(split.content, "answer");
        assert_eq!(split.thinking, vec!["reasoning here"]);
    }

    #[test]
    fn test_split_thinking_multiple_spans() {
        let split = split_thinking("<think>a</think>x<think>b</think>y");
        assert_eq!(split.content, "xy");
        assert_eq!(split.thinking, vec!["a", "b"]);
    }

    #[test]
    fn test_split_thinking_only_close_marker() {
        let split = split_thinking("</think>");
        assert_eq!(split.content, "");
        assert_eq!(split.thinking, vec![""]);
    }

    #[test]
    fn test_find_strict_call_skips_unknown_names() {
        let found = find_strict_call(
            "call:search_web{query:<escape>a<escape>} call:web_search{query:<escape>b<escape>}",
            &catalog(),
        )
        .unwrap();
        assert_eq!(found.name, "web_search");
        assert_eq!(
            found.block.unwrap().arguments.get_str("query"),
            Some("b")
        );
    }

    #[test]
    fn test_find_strict_call_requires_brace() {
        assert!(find_strict_call("call:web_search", &catalog()).is_none());
    }

    #[test]
    fn test_find_strict_call_rejects_prefix_of_longer_identifier() {
        assert!(find_strict_call("call:web_searching{}", &catalog()).is_none());
    }

    #[test]
    fn test_find_catalog_name_prefers_catalog_order() {
        let found = find_catalog_name("passthrough or web_search?", &catalog()).unwrap();
        assert_eq!(found.name, "web_search");
        assert!(found.block.is_none());
    }

    #[test]
    fn test_find_catalog_name_with_block() {
        let found =
            find_catalog_name("<start_function_call>web_search{query:<escape>rust<escape>}", &catalog())
                .unwrap();
        assert_eq!(found.block.unwrap().arguments.get_str("query"), Some("rust"));
    }
}
