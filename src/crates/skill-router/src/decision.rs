//! Routing requests, decisions and typed skill calls

use crate::error::{Result, RouterError};
use callgrammar::{ArgValue, Arguments, Confidence, DecodeStrategy, FunctionCatalog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// One utterance to route, created per turn
#[derive(Debug, Clone)]
pub struct RoutingRequest {
    pub id: Uuid,
    pub utterance: String,
    pub catalog: Arc<FunctionCatalog>,
}

impl RoutingRequest {
    pub fn new(utterance: impl Into<String>, catalog: Arc<FunctionCatalog>) -> Self {
        Self {
            id: Uuid::new_v4(),
            utterance: utterance.into(),
            catalog,
        }
    }
}

/// The router's answer for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub request_id: Uuid,
    pub function_name: String,
    pub arguments: Arguments,
    /// Time spent in inference; zero when inference was skipped or failed
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub strategy: DecodeStrategy,
    pub confidence: Confidence,
    /// Set when the keyword gate skipped the router model
    pub bypassed: bool,
}

impl RoutingDecision {
    /// Fallback decision for a request that never reached a decoded call
    pub fn fallback(request: &RoutingRequest) -> Self {
        let fallback = request.catalog.fallback();
        Self {
            request_id: request.id,
            function_name: fallback.name.clone(),
            arguments: fallback.arguments.clone(),
            elapsed: Duration::ZERO,
            strategy: DecodeStrategy::Fallback,
            confidence: Confidence::None,
            bypassed: false,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.strategy == DecodeStrategy::Fallback
    }

    /// Typed view of the decision
    ///
    /// Fails only when a parameter the typed call cannot do without is
    /// absent. Optional parameters map to `None`.
    pub fn skill_call(&self) -> Result<SkillCall> {
        let args = Fields {
            function: &self.function_name,
            args: &self.arguments,
        };

        let call = match self.function_name.as_str() {
            "control_light" => SkillCall::ControlLight {
                action: args.required("action")?,
                room: args.required("room")?,
            },
            "web_search" => SkillCall::WebSearch {
                query: args.required("query")?,
            },
            "set_timer" => SkillCall::SetTimer {
                duration: args.required("duration")?,
                seconds: args
                    .args
                    .get("seconds")
                    .and_then(ArgValue::as_i64)
                    .and_then(|s| u64::try_from(s).ok())
                    .unwrap_or(0),
                label: args.optional("label"),
            },
            "set_alarm" => SkillCall::SetAlarm {
                time: args.required("time")?,
                label: args.optional("label"),
            },
            "create_calendar_event" => SkillCall::CreateCalendarEvent {
                title: args.required("title")?,
                date: args.optional("date"),
                time: args.optional("time"),
                description: args.optional("description"),
            },
            "read_calendar" => SkillCall::ReadCalendar {
                date: args.optional("date"),
                filter: args.optional("filter"),
            },
            "add_task" => SkillCall::AddTask {
                text: args.required("text")?,
                priority: args.optional("priority"),
            },
            "get_system_info" => SkillCall::GetSystemInfo,
            "passthrough" => SkillCall::Passthrough {
                thinking: self
                    .arguments
                    .get("thinking")
                    .and_then(ArgValue::as_bool)
                    .unwrap_or(false),
            },
            other => SkillCall::Other {
                name: other.to_string(),
                arguments: self.arguments.clone(),
            },
        };

        Ok(call)
    }
}

/// A decision converted into a per-skill record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum SkillCall {
    ControlLight {
        action: String,
        room: String,
    },
    WebSearch {
        query: String,
    },
    SetTimer {
        duration: String,
        seconds: u64,
        label: Option<String>,
    },
    SetAlarm {
        time: String,
        label: Option<String>,
    },
    CreateCalendarEvent {
        title: String,
        date: Option<String>,
        time: Option<String>,
        description: Option<String>,
    },
    ReadCalendar {
        date: Option<String>,
        filter: Option<String>,
    },
    AddTask {
        text: String,
        priority: Option<String>,
    },
    GetSystemInfo,
    Passthrough {
        thinking: bool,
    },
    /// A function from a custom catalog with no typed record
    Other {
        name: String,
        arguments: Arguments,
    },
}

impl SkillCall {
    pub fn function_name(&self) -> &str {
        match self {
            SkillCall::ControlLight { .. } => "control_light",
            SkillCall::WebSearch { .. } => "web_search",
            SkillCall::SetTimer { .. } => "set_timer",
            SkillCall::SetAlarm { .. } => "set_alarm",
            SkillCall::CreateCalendarEvent { .. } => "create_calendar_event",
            SkillCall::ReadCalendar { .. } => "read_calendar",
            SkillCall::AddTask { .. } => "add_task",
            SkillCall::GetSystemInfo => "get_system_info",
            SkillCall::Passthrough { .. } => "passthrough",
            SkillCall::Other { name, .. } => name.as_str(),
        }
    }
}

struct Fields<'a> {
    function: &'a str,
    args: &'a Arguments,
}

impl Fields<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        self.args
            .get(key)
            .map(ArgValue::to_string)
            .filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| RouterError::missing(self.function, key))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
