// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
///
/// Millisecond precision keeps records created in the same second ordered.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Record timestamp for "now".
pub fn timestamp_now() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Calendar day (`YYYY-MM-DD`) of a UTC timestamp.
pub fn calendar_day(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's calendar day in UTC.
pub fn today() -> String {
    calendar_day(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats_with_z_suffix_and_millis() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-03-09T07:05:01.000Z");
        assert_eq!(calendar_day(date), "2024-03-09");
    }
}
