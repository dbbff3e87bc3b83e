//! Argument normalization
//!
//! Turns the free text small models put into arguments into values skills can
//! use directly. Every function here is total. Values that normalize to
//! something a skill will reject (a zero-second timer, say) are left for the
//! skill to report.

mod clock;
mod date;
mod duration;
mod synthesis;

pub use clock::normalize_clock;
pub use date::resolve_date;
pub use duration::parse_duration;
pub use synthesis::synthesize_arguments;

use callgrammar::{ArgValue, Arguments};
use chrono::NaiveDate;

/// Normalize the arguments of one decoded call in place
///
/// * `set_timer`: adds `seconds` parsed from `duration`
/// * `set_alarm`, `create_calendar_event`: `time` to 24-hour `HH:MM`
/// * `create_calendar_event`, `read_calendar`: `date` to `YYYY-MM-DD`
/// * `control_light`: `action` lower-cased
pub fn normalize_arguments(function: &str, args: &mut Arguments, today: NaiveDate) {
    match function {
        "set_timer" => {
            if let Some(duration) = args.get("duration").map(ArgValue::to_string) {
                let seconds = parse_duration(&duration);
                args.insert("seconds", i64::try_from(seconds).unwrap_or(i64::MAX));
            }
        }
        "set_alarm" => normalize_time(args),
        "create_calendar_event" => {
            normalize_time(args);
            normalize_date(args, today);
        }
        "read_calendar" => normalize_date(args, today),
        "control_light" => {
            if let Some(action) = args.get_str("action") {
                let lowered = action.trim().to_lowercase();
                args.insert("action", lowered);
            }
        }
        _ => {}
    }
}

fn normalize_time(args: &mut Arguments) {
    if let Some(time) = args.get("time").map(ArgValue::to_string) {
        args.insert("time", normalize_clock(&time));
    }
}

fn normalize_date(args: &mut Arguments, today: NaiveDate) {
    if let Some(date) = args.get("date").map(ArgValue::to_string) {
        let resolved = resolve_date(&date, today);
        args.insert("date", resolved.format("%Y-%m-%d").to_string());
    }
}
