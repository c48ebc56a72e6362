//! Time formatting utilities for user-friendly display.
//!
//! This module converts durations and timestamps into the strings shown by the
//! timer, the status screen and the history tables.
//!
//! ## Format Specifications
//!
//! - **Elapsed time** ([`format_elapsed`]): `HH:MM:SS`, floored to whole
//!   seconds, each part zero-padded to two digits. Hours are not capped, so a
//!   multi-day fast renders as `100:00:00`.
//! - **Durations** ([`format_duration`]): `HH:MM`, used in history rows where
//!   seconds are noise.
//! - **Clock time** ([`format_clock_time`]): 12-hour wall clock in the local
//!   timezone, `h:MM AM/PM`, with midnight rendered as `12`.
//!
//! Negative inputs are treated as zero. None of the functions can fail.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::Duration;
//! use fastline::libs::formatter::{format_duration, format_elapsed};
//!
//! assert_eq!(format_elapsed(Duration::milliseconds(3_661_000)), "01:01:01");
//! assert_eq!(format_duration(&(Duration::hours(16) + Duration::minutes(5))), "16:05");
//! ```

use crate::libs::fast::CompletedFast;
use crate::libs::weight::{WeightEntry, WeightUnit};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A completed fast prepared for table display and export.
///
/// All values are pre-formatted strings so the same rows can feed the
/// terminal table, the CSV writer and the JSON exporter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedFast {
    /// Position in the history list, starting from 1 for the most recent fast.
    pub id: i32,
    /// The plan active when the fast started, or "-" when unknown.
    pub plan: String,
    /// Local start date and time.
    pub start: String,
    /// Local end date and time.
    pub end: String,
    /// Actual fasting time, `HH:MM`.
    pub duration: String,
    /// Planned fasting time, `HH:MM`.
    pub target: String,
    /// Whether the planned duration was reached.
    pub reached: bool,
}

/// A weight entry prepared for table display and export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedWeight {
    pub id: String,
    pub date: String,
    /// Weight converted to the display unit, one decimal.
    pub weight: String,
    pub note: String,
    pub source: String,
}

/// Formats a chrono::Duration into a standardized "HH:MM" string.
///
/// Hours are zero-padded to at least two digits and are not capped. Seconds
/// are dropped. Negative durations render as "00:00".
///
/// ```rust
/// use fastline::libs::formatter::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(&Duration::hours(18)), "18:00");
/// assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
/// assert_eq!(format_duration(&Duration::hours(-1)), "00:00");
/// ```
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Formats elapsed fasting time as "HH:MM:SS".
///
/// The value is floored to whole seconds before being split, so 999ms still
/// shows as "00:00:00". Distinct whole-second values always produce distinct
/// strings.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.num_milliseconds().max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Renders an epoch-milliseconds timestamp as a local 12-hour clock time,
/// for example "9:05 PM".
pub fn format_clock_time(epoch_ms: i64) -> String {
    format_clock_time_in(&Local, epoch_ms)
}

/// Same as [`format_clock_time`] for an explicit timezone.
///
/// Timestamps outside chrono's representable range render as "--:--".
pub fn format_clock_time_in<Tz>(tz: &Tz, epoch_ms: i64) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(epoch_ms).single() {
        // %I is already 12 for the midnight hour
        Some(time) => time.format("%-I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

/// Local "YYYY-MM-DD HH:MM" rendering used in tables.
pub fn format_local_datetime(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Builds display rows for a slice of history, most recent first.
pub fn format_fasts(fasts: &[CompletedFast]) -> Vec<FormattedFast> {
    fasts
        .iter()
        .enumerate()
        .map(|(index, fast)| FormattedFast {
            id: (index + 1) as i32,
            plan: fast.plan.clone().unwrap_or_else(|| "-".to_string()),
            start: format_local_datetime(&fast.start_time),
            end: format_local_datetime(&fast.end_time),
            duration: format_duration(&fast.duration()),
            target: format_duration(&fast.planned_duration),
            reached: fast.reached_target(),
        })
        .collect()
}

/// Builds display rows for weight entries in the given unit.
pub fn format_weights(entries: &[WeightEntry], unit: WeightUnit) -> Vec<FormattedWeight> {
    entries
        .iter()
        .map(|entry| FormattedWeight {
            id: entry.id.clone(),
            date: format_local_datetime(&entry.date),
            weight: format!("{:.1} {}", entry.weight_in(unit), unit),
            note: entry.note.clone().unwrap_or_default(),
            source: entry.source.to_string(),
        })
        .collect()
}
