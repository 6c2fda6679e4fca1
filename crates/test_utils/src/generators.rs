//! Property-Based Test Generators
//!
//! Provides proptest strategies for amounts, dates, and item inputs.

use chrono::{Days, NaiveDate};
use core_kernel::{DateRange, Money};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-negative amounts with two decimal places
pub fn monto_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

/// Strategy for dates within 2020-2030
pub fn fecha_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..3_650u64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|base| base.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

/// Strategy for well-ordered date ranges
pub fn date_range_strategy() -> impl Strategy<Value = DateRange> {
    (fecha_strategy(), 0u64..120u64).prop_map(|(desde, len)| {
        DateRange::new(desde, desde.checked_add_days(Days::new(len)).unwrap())
    })
}

/// Strategy for item tags other than the two accepted ones
pub fn invalid_tag_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{0,3}".prop_filter("accepted tag", |tag| tag != "P" && tag != "M")
}

/// Strategy for keys that cannot reference a stored row
pub fn unassigned_id_strategy() -> impl Strategy<Value = i32> {
    i32::MIN..=0
}
