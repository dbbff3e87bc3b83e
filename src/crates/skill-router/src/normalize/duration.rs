//! Free-text durations to seconds

use regex::Regex;
use std::sync::LazyLock;

static UNITS: LazyLock<[(Regex, u64); 3]> = LazyLock::new(|| {
    [
        (Regex::new(r"([0-9]+)\s*h(?:our)?s?").unwrap(), 3600),
        (Regex::new(r"([0-9]+)\s*m(?:in(?:ute)?s?)?").unwrap(), 60),
        (Regex::new(r"([0-9]+)\s*s(?:ec(?:ond)?s?)?").unwrap(), 1),
    ]
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Parse a duration such as "5 minutes" or "1 hour 30 minutes" into seconds
///
/// The first hour, minute and second amounts are summed. Text with no unit
/// falls back to its first number read as minutes, and anything else is 0.
///
/// ```rust
/// use skill_router::normalize::parse_duration;
///
/// assert_eq!(parse_duration("1 hour 30 minutes"), 5400);
/// assert_eq!(parse_duration("10"), 600);
/// assert_eq!(parse_duration("banana"), 0);
/// ```
pub fn parse_duration(text: &str) -> u64 {
    let text = text.trim().to_lowercase();

    let total = UNITS.iter().fold(0u64, |total, (re, multiplier)| {
        match re.captures(&text).and_then(|c| c[1].parse::<u64>().ok()) {
            Some(n) => total.saturating_add(n.saturating_mul(*multiplier)),
            None => total,
        }
    });
    if total > 0 {
        return total;
    }

    NUMBER
        .find(&text)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map_or(0, |n| n.saturating_mul(60))
}
