//! Recovery of JSON-shaped calls from the reasoning channel

use crate::catalog::FunctionCatalog;
use crate::decode::arguments::coerce_value;
use crate::types::{ArgValue, Arguments};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static ACTION_OBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{[^{}]*"action"\s*:[^{}]*\}"#).unwrap());

/// Keys that may name the function inside a JSON-shaped call
const NAME_KEYS: [&str; 4] = ["function", "name", "call", "tool"];

/// A call recovered from a JSON object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCall {
    pub name: String,
    pub arguments: Arguments,
}

/// Find the first flat JSON object with an `"action"` key that resolves to a
/// catalog function
///
/// The function is taken from a name key (`function`, `name`, `call`,
/// `tool`), else from `action` when its value is a catalog name, else from the
/// first spec whose parameters cover every key of the object. Arguments keep
/// only declared parameters.
pub fn extract_action_object(text: &str, catalog: &FunctionCatalog) -> Option<JsonCall> {
    ACTION_OBJECT_REGEX
        .find_iter(text)
        .filter_map(|m| serde_json::from_str::<Map<String, Value>>(m.as_str()).ok())
        .find_map(|object| resolve_object(&object, catalog))
}

fn resolve_object(object: &Map<String, Value>, catalog: &FunctionCatalog) -> Option<JsonCall> {
    let named = NAME_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .filter(|name| catalog.contains(name))
            .map(|name| (name.to_string(), Some(*key)))
    });

    let (name, consumed) = named
        .or_else(|| {
            object
                .get("action")
                .and_then(Value::as_str)
                .filter(|name| catalog.contains(name))
                .map(|name| (name.to_string(), Some("action")))
        })
        .or_else(|| {
            catalog
                .list_specs()
                .iter()
                .find(|spec| object.keys().all(|k| spec.has_parameter(k)))
                .map(|spec| (spec.name().to_string(), None))
        })?;

    let spec = catalog.get(&name).ok()?;
    let arguments = object
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != consumed && spec.has_parameter(key))
        .filter_map(|(key, value)| json_to_arg(value).map(|v| (key.clone(), v)))
        .collect();

    Some(JsonCall { name, arguments })
}

fn json_to_arg(value: &Value) -> Option<ArgValue> {
    match value {
        Value::String(s) => Some(coerce_value(s)),
        Value::Bool(b) => Some(ArgValue::Boolean(*b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => ArgValue::Integer(i),
            None => ArgValue::String(n.to_string()),
        }),
        Value::Null => None,
        other => Some(ArgValue::String(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Fallback, FunctionSpec};
    use crate::types::ParamType;

    fn catalog() -> FunctionCatalog {
        FunctionCatalog::new(
            vec![
                FunctionSpec::builder("control_light", "Lights")
                    .param("action", ParamType::String, "on/off")
                    .param("room", ParamType::String, "room")
                    .build(),
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
    fn test_named_function_key() {
        let call = extract_action_object(
            r#"I think {"function": "web_search", "action": "search", "query": "rust"} works"#,
            &catalog(),
        )
        .unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.arguments.get_str("query"), Some("rust"));
        assert!(!call.arguments.contains_key("action"));
    }

    #[test]
    fn test_action_is_function_name() {
        let call = extract_action_object(
            r#"{"action": "web_search", "query": "weather", "reasoning": "user asked"}"#,
            &catalog(),
        )
        .unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn test_parameter_signature_match() {
        let call =
            extract_action_object(r#"{"action": "on", "room": "kitchen"}"#, &catalog()).unwrap();
        assert_eq!(call.name, "control_light");
        assert_eq!(call.arguments.get_str("action"), Some("on"));
        assert_eq!(call.arguments.get_str("room"), Some("kitchen"));
    }

    #[test]
    fn test_unresolvable_object() {
        assert!(extract_action_object(r#"{"action": "dance", "tempo": 3}"#, &catalog()).is_none());
    }

    #[test]
    fn test_action_as_value_is_not_a_key() {
        // Would otherwise resolve to web_search by its parameter signature
        assert!(extract_action_object(r#"{"query": "action"}"#, &catalog()).is_none());

        let text = r#"{"query": "action"} {"action" : "web_search", "query": "films"}"#;
        let call = extract_action_object(text, &catalog()).unwrap();
        assert_eq!(call.arguments.get_str("query"), Some("films"));
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let text = r#"{"action": broken} then {"action": "web_search", "query": "x"}"#;
        assert_eq!(extract_action_object(text, &catalog()).unwrap().name, "web_search");
    }
}
