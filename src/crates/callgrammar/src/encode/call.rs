//! Function call encoding (the model turn)

use crate::constants::{CALL_PREFIX, CLOSE_BRACE, END_CALL, OPEN_BRACE, START_CALL};
use crate::encode::writer::GrammarWriter;
use crate::types::Arguments;

/// Encode a call the way the router model is trained to emit it
///
/// Every value is escaped regardless of type; the decoder coerces digit-only
/// and boolean literals back.
pub fn encode_call(name: &str, arguments: &Arguments) -> String {
    let mut w = GrammarWriter::new();
    w.push_str(START_CALL);
    w.push_str(CALL_PREFIX);
    w.push_str(name);
    w.open(OPEN_BRACE);
    for (key, value) in arguments.iter() {
        w.escaped_field(key, &value.to_string());
    }
    w.close(CLOSE_BRACE);
    w.push_str(END_CALL);
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_call() {
        let args = Arguments::new().with("action", "on").with("room", "kitchen");
        assert_eq!(
            encode_call("control_light", &args),
            "<start_function_call>call:control_light{action:<escape>on<escape>,room:<escape>kitchen<escape>}<end_function_call>"
        );
    }

    #[test]
    fn test_encode_call_typed_values() {
        let args = Arguments::new().with("thinking", true).with("minutes", 5i64);
        assert_eq!(
            encode_call("passthrough", &args),
            "<start_function_call>call:passthrough{thinking:<escape>true<escape>,minutes:<escape>5<escape>}<end_function_call>"
        );
    }

    #[test]
    fn test_encode_call_no_arguments() {
        assert_eq!(
            encode_call("get_system_info", &Arguments::new()),
            "<start_function_call>call:get_system_info{}<end_function_call>"
        );
    }
}
