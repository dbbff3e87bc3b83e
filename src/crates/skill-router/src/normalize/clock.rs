//! Spoken clock times to 24-hour `HH:MM`

use regex::Regex;
use std::sync::LazyLock;

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):?([0-9]{2})?\s*(am|pm)?").unwrap());

/// Normalize "7am", "7:30pm" or "14:30" to `HH:MM`
///
/// Input that does not start with a valid time comes back unchanged.
pub fn normalize_clock(text: &str) -> String {
    parse_clock(text).unwrap_or_else(|| text.to_string())
}

fn parse_clock(text: &str) -> Option<String> {
    let lowered = text.trim().to_lowercase();
    let caps = CLOCK.captures(&lowered)?;

    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    match caps.get(3).map(|m| m.as_str()) {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    if hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", hour, minute))
}
