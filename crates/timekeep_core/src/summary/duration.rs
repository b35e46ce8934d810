//! Elapsed-time computations and timer labels.
//!
//! # Invariants
//! - No function here fails; missing or reversed endpoints degrade to an
//!   empty label or zero seconds.
//! - Hours are not wrapped at 24: a 26 hour interval renders as `26:00:00`.

use crate::model::record::Timestamp;
use crate::model::time_entry::TimeEntry;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Whole seconds from `start` to `end`, clamped at zero.
pub fn elapsed_seconds(start: Timestamp, end: Timestamp) -> i64 {
    (end - start).num_seconds().max(0)
}

/// Renders `seconds` as zero-padded `HH:MM:SS`.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// `HH:MM:SS` between two instants, or `""` when either is missing.
pub fn formatted_interval(start: Option<Timestamp>, end: Option<Timestamp>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format_hms(elapsed_seconds(start, end)),
        _ => String::new(),
    }
}

/// Like [`formatted_interval`] but a missing `end` runs until `now`.
pub fn live_formatted_interval(
    now: Timestamp,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> String {
    formatted_interval(start, Some(end.unwrap_or(now)))
}

/// Live timer label for one entry; `""` when there is no entry.
pub fn entry_duration_label(now: Timestamp, entry: Option<&TimeEntry>) -> String {
    match entry {
        Some(entry) => live_formatted_interval(now, Some(entry.start_time), entry.end_time),
        None => String::new(),
    }
}

/// Seconds elapsed for one entry, treating an open entry as running to `now`.
pub fn entry_seconds(entry: &TimeEntry, now: Timestamp) -> i64 {
    elapsed_seconds(entry.start_time, entry.end_time.unwrap_or(now))
}

/// Sum of entry durations in seconds.
pub fn entries_total_time(entries: &[TimeEntry], now: Timestamp) -> i64 {
    entries.iter().map(|entry| entry_seconds(entry, now)).sum()
}

/// Wall-clock label in `tz`, e.g. `3:5:9 PM` for 15:05:09.
///
/// Fields are unpadded; `""` when `instant` is missing.
pub fn clock_time_label<Tz>(instant: Option<Timestamp>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant
        .map(|instant| {
            let local: DateTime<Tz> = instant.with_timezone(tz);
            local.format("%-I:%-M:%-S %p").to_string()
        })
        .unwrap_or_default()
}
