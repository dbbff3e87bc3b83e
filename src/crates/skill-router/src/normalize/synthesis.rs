//! Argument synthesis for calls recovered without arguments

use callgrammar::Arguments;

/// Fill the most salient parameter of `function` from the utterance
///
/// Used when decoding recovered a function name but no argument block.
/// Unknown functions get no arguments.
pub fn synthesize_arguments(function: &str, utterance: &str) -> Arguments {
    let text = utterance.trim();
    match function {
        "control_light" => Arguments::new().with("action", "toggle").with("room", text),
        "set_timer" => Arguments::new().with("duration", text),
        "set_alarm" => Arguments::new().with("time", text),
        "create_calendar_event" => Arguments::new().with("title", text),
        "read_calendar" => Arguments::new().with("date", "today"),
        "add_task" => Arguments::new().with("text", text),
        "web_search" => Arguments::new().with("query", text),
        "passthrough" => Arguments::new().with("thinking", false),
        _ => Arguments::new(),
    }
}
