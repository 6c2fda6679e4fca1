//! Unit tests for inclusive date ranges

use chrono::NaiveDate;
use core_kernel::DateRange;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_around_spans_both_sides() {
    let range = DateRange::around(date(2024, 3, 10), 5);
    assert_eq!(range.desde, date(2024, 3, 5));
    assert_eq!(range.hasta, date(2024, 3, 15));
}

#[test]
fn test_around_saturates_at_calendar_limits() {
    let range = DateRange::around(NaiveDate::MIN, 5);
    assert_eq!(range.desde, NaiveDate::MIN);
}

#[test]
fn test_display() {
    let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(range.to_string(), "2024-01-01..=2024-01-31");
}

proptest! {
    #[test]
    fn prop_contains_matches_bounds(start in 0u32..365, len in 0u32..60, offset in 0u32..450) {
        let base = date(2024, 1, 1);
        let desde = base + chrono::Days::new(start as u64);
        let hasta = desde + chrono::Days::new(len as u64);
        let day = base + chrono::Days::new(offset as u64);
        let range = DateRange::new(desde, hasta);
        prop_assert_eq!(range.contains(day), desde <= day && day <= hasta);
    }
}
