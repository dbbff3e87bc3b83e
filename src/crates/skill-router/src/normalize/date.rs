//! Relative dates to calendar dates

use chrono::{Datelike, Duration, NaiveDate, Weekday};

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Resolve "today", "tomorrow", a weekday name or an ISO date against `today`
///
/// A weekday resolves to its next occurrence strictly after `today`, one week
/// further when the text says "next". Anything unrecognised is `today`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use skill_router::normalize::resolve_date;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(); // a Monday
/// assert_eq!(resolve_date("friday", today), NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
/// ```
pub fn resolve_date(text: &str, today: NaiveDate) -> NaiveDate {
    let text = text.trim().to_lowercase();

    match text.as_str() {
        "" | "today" => return today,
        "tomorrow" => return today + Duration::days(1),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return date;
    }

    for (name, weekday) in WEEKDAYS {
        if text.contains(name) {
            let current = today.weekday().num_days_from_monday() as i64;
            let target = weekday.num_days_from_monday() as i64;
            let mut ahead = target - current;
            if ahead <= 0 {
                ahead += 7;
            }
            if text.contains("next") {
                ahead += 7;
            }
            return today + Duration::days(ahead);
        }
    }

    today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_relative_words() {
        assert_eq!(resolve_date("today", monday()), monday());
        assert_eq!(resolve_date("", monday()), monday());
        assert_eq!(resolve_date("Tomorrow", monday()), day(20));
    }

    #[test]
    fn test_weekdays_are_strictly_after_today() {
        assert_eq!(resolve_date("wednesday", monday()), day(21));
        assert_eq!(resolve_date("monday", monday()), day(26));
        assert_eq!(resolve_date("on sunday", monday()), day(25));
    }

    #[test]
    fn test_next_weekday_adds_a_week() {
        assert_eq!(resolve_date("next wednesday", monday()), day(28));
    }

    #[test]
    fn test_iso_and_unknown() {
        assert_eq!(
            resolve_date("2026-12-24", monday()),
            NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()
        );
        assert_eq!(resolve_date("someday", monday()), monday());
    }
}
