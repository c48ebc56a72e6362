//! Fasting plans and planned-duration resolution.
//!
//! A plan is either one of the named fast/eat ratios in [`PLANS`] (for example
//! `"16:8"`, sixteen hours fasting and eight eating) or the literal
//! [`CUSTOM_PLAN`], whose length comes from the user's custom hour count.
//!
//! [`resolve_duration`] turns a plan identifier into the planned duration of a
//! fast. It never fails: anything it cannot make sense of falls back to
//! [`DEFAULT_FASTING_HOURS`] with a logged warning. Range checking of custom
//! durations is a separate, user-facing step ([`validate_custom_hours`]).
//!
//! ```rust
//! use fastline::libs::plan::resolve_duration;
//!
//! assert_eq!(resolve_duration("16:8", None).num_milliseconds(), 57_600_000);
//! assert_eq!(resolve_duration("custom", Some(36.0)).num_hours(), 36);
//! ```

use crate::libs::error::FastingError;
use chrono::Duration;
use tracing::warn;

/// Identifier of the user-defined plan.
pub const CUSTOM_PLAN: &str = "custom";

/// Plan selected for new installations.
pub const DEFAULT_PLAN: &str = "16:8";

/// Fallback length used whenever a duration cannot be resolved.
pub const DEFAULT_FASTING_HOURS: f64 = 16.0;

/// Inclusive bounds accepted for a custom fast.
pub const MIN_CUSTOM_HOURS: f64 = 4.0;
pub const MAX_CUSTOM_HOURS: f64 = 48.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A named fasting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastingPlan {
    pub id: &'static str,
    pub fasting_hours: u32,
    pub eating_hours: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed plan catalogue, shortest fast first.
pub const PLANS: &[FastingPlan] = &[
    FastingPlan {
        id: "12:12",
        fasting_hours: 12,
        eating_hours: 12,
        name: "Circadian",
        description: "Gentle start: an overnight fast with an even eating window",
    },
    FastingPlan {
        id: "14:10",
        fasting_hours: 14,
        eating_hours: 10,
        name: "Early bird",
        description: "A slightly longer overnight fast",
    },
    FastingPlan {
        id: "16:8",
        fasting_hours: 16,
        eating_hours: 8,
        name: "Leangains",
        description: "The most popular schedule: skip breakfast, eat within eight hours",
    },
    FastingPlan {
        id: "18:6",
        fasting_hours: 18,
        eating_hours: 6,
        name: "Fat burner",
        description: "Two meals inside a six-hour window",
    },
    FastingPlan {
        id: "20:4",
        fasting_hours: 20,
        eating_hours: 4,
        name: "Warrior",
        description: "One large meal and a snack within four hours",
    },
    FastingPlan {
        id: "23:1",
        fasting_hours: 23,
        eating_hours: 1,
        name: "OMAD",
        description: "One meal a day",
    },
];

impl FastingPlan {
    /// Looks a named plan up by identifier.
    pub fn find(id: &str) -> Option<&'static FastingPlan> {
        PLANS.iter().find(|plan| plan.id == id)
    }

    pub fn duration(&self) -> Duration {
        Duration::hours(self.fasting_hours as i64)
    }
}

/// Maps a plan identifier (and, for [`CUSTOM_PLAN`], a custom hour count) to
/// the planned fasting duration.
///
/// Named plans are resolved by the integer before the separator, so `"16:8"`
/// gives sixteen hours. Unparseable plans, a missing custom hour count and
/// non-positive or non-finite custom values all fall back to
/// [`DEFAULT_FASTING_HOURS`] and emit a warning. The result is always a
/// positive duration.
pub fn resolve_duration(plan: &str, custom_hours: Option<f64>) -> Duration {
    if plan == CUSTOM_PLAN {
        return match custom_hours {
            Some(hours) if hours.is_finite() && hours > 0.0 => hours_to_duration(hours),
            Some(hours) => {
                warn!(plan, hours, "invalid custom fasting duration, falling back to default");
                hours_to_duration(DEFAULT_FASTING_HOURS)
            }
            None => {
                warn!(plan, "custom plan without a duration, falling back to default");
                hours_to_duration(DEFAULT_FASTING_HOURS)
            }
        };
    }

    match parse_plan_hours(plan) {
        Some(hours) => Duration::hours(hours as i64),
        None => {
            warn!(plan, "unable to parse fasting plan, falling back to default");
            hours_to_duration(DEFAULT_FASTING_HOURS)
        }
    }
}

/// Reads the leading fasting-hour count of a plan identifier such as `"18:6"`.
///
/// Returns `None` when the identifier does not start with a positive integer.
pub fn parse_plan_hours(plan: &str) -> Option<u32> {
    let digits: String = plan.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(hours) if hours > 0 => Some(hours),
        _ => None,
    }
}

/// Converts fractional hours to a duration rounded to the millisecond.
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
}

/// Checks a custom fast length against the accepted range.
pub fn validate_custom_hours(hours: f64) -> Result<f64, FastingError> {
    if hours.is_finite() && (MIN_CUSTOM_HOURS..=MAX_CUSTOM_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(FastingError::CustomDurationOutOfRange {
            hours,
            min: MIN_CUSTOM_HOURS,
            max: MAX_CUSTOM_HOURS,
        })
    }
}

/// Accepts [`CUSTOM_PLAN`] or an identifier from the catalogue.
pub fn validate_plan(plan: &str) -> Result<&str, FastingError> {
    if plan == CUSTOM_PLAN || FastingPlan::find(plan).is_some() {
        Ok(plan)
    } else {
        Err(FastingError::UnknownPlan(plan.to_string()))
    }
}
