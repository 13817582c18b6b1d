//! Time utilities: timezone-aware day identifiers.
//!
//! Every date the engine stores is a `NaiveDate` in the engine's time zone.
//! Raw instants are normalized through [`day_of`] before they touch a date set.

use anyhow::Result;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse an IANA time zone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Local calendar day of `instant` in `tz`.
pub fn day_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Whole calendar days from `from` to `to` (negative if `to` is earlier).
pub fn day_gap(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_sunday())))
}
