//! The assistant's built-in skill catalog

use callgrammar::{Arguments, Fallback, FunctionCatalog, FunctionSpec, GrammarResult, ParamType};

/// Name of the function that hands a turn to the conversational model
pub const PASSTHROUGH: &str = "passthrough";

/// Nine skills in the order the router model was trained on, ending with
/// `passthrough`, which is also the fallback with `thinking: false`.
pub fn default_catalog() -> GrammarResult<FunctionCatalog> {
    FunctionCatalog::new(default_specs(), passthrough_fallback())
}

pub fn passthrough_fallback() -> Fallback {
    Fallback::new(PASSTHROUGH, Arguments::new().with("thinking", false))
}

pub fn default_specs() -> Vec<FunctionSpec> {
    use ParamType::{Boolean, String};

    vec![
        FunctionSpec::builder(
            "control_light",
            "Controls smart lights - turn on, off, or dim lights in a room",
        )
        .param("action", String, "The action to perform: on, off, or dim")
        .param("room", String, "The room name where the light is located")
        .required("action")
        .required("room")
        .build(),
        FunctionSpec::builder("web_search", "Searches the web for information using Google")
            .param("query", String, "The search query string")
            .required("query")
            .build(),
        FunctionSpec::builder("set_timer", "Sets a countdown timer for a specified duration")
            .param("duration", String, "Time duration like 5 minutes or 1 hour")
            .param("label", String, "Optional timer name or label")
            .required("duration")
            .build(),
        FunctionSpec::builder("set_alarm", "Set an alarm for a specific time.")
            .param("time", String, "Time for alarm like '7am' or '14:30'")
            .param("label", String, "Optional label")
            .required("time")
            .build(),
        FunctionSpec::builder("create_calendar_event", "Creates a new calendar event or appointment")
            .param("title", String, "The event title")
            .param("date", String, "The date of the event")
            .param("time", String, "The time of the event")
            .param("description", String, "Optional event details")
            .required("title")
            .required("date")
            .build(),
        FunctionSpec::builder(
            "read_calendar",
            "Reads and retrieves calendar events for a date or time range",
        )
        .param("date", String, "The date or date range to check")
        .param("filter", String, "Optional filter like meetings or appointments")
        .required("date")
        .build(),
        FunctionSpec::builder("add_task", "Add a task to the to-do list.")
            .param("text", String, "Task description")
            .param("priority", String, "Priority level")
            .required("text")
            .build(),
        FunctionSpec::builder(
            "get_system_info",
            "Get current system state including timers, calendar, tasks, devices, and weather.",
        )
        .build(),
        FunctionSpec::builder(
            PASSTHROUGH,
            "Routes the query to a conversational AI model when no specific tool action is needed.",
        )
        .param(
            "thinking",
            Boolean,
            "Set to true for complex reasoning, false for simple chat.",
        )
        .required("thinking")
        .build(),
    ]
}
