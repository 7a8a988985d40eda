//! Business-day arithmetic.
//!
//! Weekends are the only non-business days; holidays are not modeled.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Whether a date falls on a weekend.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The date `n` business days before `date`.
pub fn business_days_before(date: NaiveDate, n: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = n;
    while remaining > 0 {
        current -= Duration::days(1);
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

/// The date `n` business days after `date`.
pub fn business_days_after(date: NaiveDate, n: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = n;
    while remaining > 0 {
        current += Duration::days(1);
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

/// All non-weekend dates in the window stretching `padding` business
/// days before `start` through `padding` business days after `end`.
pub fn blackout_window(start: NaiveDate, end: NaiveDate, padding: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = business_days_before(start, padding);
    let last = business_days_after(end, padding);
    while current <= last {
        if !is_weekend(current) {
            dates.push(current);
        }
        current += Duration::days(1);
    }
    dates
}
