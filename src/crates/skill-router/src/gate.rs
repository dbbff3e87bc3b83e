//! Pre-routing keyword gate
//!
//! Most chit-chat never needs the router model. The gate looks for skill and
//! reasoning keywords and lets everything else go straight to the
//! conversational model.

use serde::{Deserialize, Serialize};

/// Built-in keywords: one group per skill, then reasoning triggers.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // control_light
    "light", "lamp", "turn on", "turn off", "switch on", "switch off", "dim", "bright",
    // set_timer / set_alarm
    "timer", "countdown", "alarm", "wake", "remind",
    // calendar
    "calendar", "schedule", "meeting", "appointment", "event", "agenda",
    // add_task
    "task", "todo", "to-do", "to do",
    // web_search
    "search", "google", "look up", "find", "news",
    // get_system_info
    "weather", "system", "status", "devices",
    // reasoning triggers for passthrough(thinking)
    "explain", "why", "how", "code", "write", "calculate", "solve", "analyze",
    "compare", "prove", "step by step",
];

/// Case-insensitive substring gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    enabled: bool,
    keywords: Vec<String>,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl Gate {
    /// Enabled gate over the given keywords
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            enabled: true,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// A gate that never bypasses
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            keywords: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when the utterance contains none of the keywords
    pub fn should_bypass(&self, utterance: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let lowered = utterance.to_lowercase();
        !self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}
