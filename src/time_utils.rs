// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc, Weekday};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The Saturday of the weekend containing `date`, if `date` falls on a
/// Saturday or Sunday.
pub fn weekend_saturday(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => Some(date),
        Weekday::Sun => date.pred_opt(),
        _ => None,
    }
}

/// The other half of the weekend pair: Sunday for a Saturday date,
/// Saturday for a Sunday date.
pub fn paired_weekend_day(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.succ_opt(),
        Weekday::Sun => date.pred_opt(),
        _ => None,
    }
}
