//! Normalizer and gate laws
//!
//! The normalizers are total: any input yields a value and never panics.
//! The gate has no false positives: an utterance containing a keyword is
//! never bypassed.

mod common;

use chrono::NaiveDate;
use common::today;
use proptest::prelude::*;
use skill_router::normalize::{normalize_clock, parse_duration, resolve_date};
use skill_router::{Gate, DEFAULT_KEYWORDS};

#[test]
fn test_duration_examples() {
    assert_eq!(parse_duration("5 minutes"), 300);
    assert_eq!(parse_duration("1 hour 30 minutes"), 5400);
    assert_eq!(parse_duration("90 seconds"), 90);
    assert_eq!(parse_duration("banana"), 0);
    assert_eq!(parse_duration("10"), 600);
}

#[test]
fn test_clock_examples() {
    assert_eq!(normalize_clock("7am"), "07:00");
    assert_eq!(normalize_clock("7:30pm"), "19:30");
    assert_eq!(normalize_clock("14:30"), "14:30");
}

proptest! {
    #[test]
    fn prop_keyword_never_bypassed(
        prefix in "[a-zA-Z ]{0,20}",
        suffix in "[a-zA-Z ]{0,20}",
        index in 0..DEFAULT_KEYWORDS.len(),
        upper in any::<bool>(),
    ) {
        let keyword = if upper {
            DEFAULT_KEYWORDS[index].to_uppercase()
        } else {
            DEFAULT_KEYWORDS[index].to_string()
        };
        let utterance = format!("{}{}{}", prefix, keyword, suffix);
        prop_assert!(!Gate::default().should_bypass(&utterance));
    }

    #[test]
    fn prop_minutes_round_trip(n in 1u64..100_000) {
        prop_assert_eq!(parse_duration(&format!("{} minutes", n)), n * 60);
        prop_assert_eq!(parse_duration(&n.to_string()), n * 60);
    }

    #[test]
    fn prop_duration_is_total(s in any::<String>()) {
        let _ = parse_duration(&s);
    }

    #[test]
    fn prop_clock_output_is_valid_or_unchanged(s in any::<String>()) {
        let out = normalize_clock(&s);
        let valid = out.len() == 5
            && out.as_bytes()[2] == b':'
            && out[..2].parse::<u32>().map_or(false, |h| h < 24)
            && out[3..].parse::<u32>().map_or(false, |m| m < 60);
        prop_assert!(valid || out == s);
    }

    #[test]
    fn prop_twenty_four_hour_is_fixed_point(h in 0u32..24, m in 0u32..60) {
        let s = format!("{:02}:{:02}", h, m);
        prop_assert_eq!(normalize_clock(&s), s);
    }

    #[test]
    fn prop_date_is_never_in_the_past(s in any::<String>()) {
        let iso = NaiveDate::parse_from_str(&s.trim().to_lowercase(), "%Y-%m-%d");
        prop_assume!(iso.is_err());
        prop_assert!(resolve_date(&s, today()) >= today());
    }
}
