//! Calendar date ranges
//!
//! Claim listings filter on the presentation date with both bounds included.
//! An inverted range is not an error: it simply contains no dates, which is
//! how the database answers `BETWEEN` with swapped bounds.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First date in the range
    pub desde: NaiveDate,
    /// Last date in the range
    pub hasta: NaiveDate,
}

impl DateRange {
    /// Creates a new inclusive range
    pub fn new(desde: NaiveDate, hasta: NaiveDate) -> Self {
        Self { desde, hasta }
    }

    /// Creates a range of `days` on each side of `center`
    ///
    /// Saturates at the calendar limits instead of failing.
    pub fn around(center: NaiveDate, days: u64) -> Self {
        let desde = center
            .checked_sub_days(Days::new(days))
            .unwrap_or(NaiveDate::MIN);
        let hasta = center
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        Self { desde, hasta }
    }

    /// Returns true if `date` falls within the range, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.desde <= date && date <= self.hasta
    }

    /// Returns true if the bounds are inverted and no date can match
    pub fn is_empty(&self) -> bool {
        self.desde > self.hasta
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.desde, self.hasta)
    }
}
