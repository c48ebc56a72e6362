//! Typed errors surfaced to the user.
//!
//! These cover the validation and lifecycle failures a caller is expected to
//! show verbatim. Storage and network problems are not represented here: they
//! are logged where they happen and the in-memory state stays authoritative.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FastingError {
    #[error("Custom fasting duration must be between {min} and {max} hours, got {hours}")]
    CustomDurationOutOfRange { hours: f64, min: f64, max: f64 },

    #[error("Unknown fasting plan '{0}'")]
    UnknownPlan(String),

    #[error("A fast is already in progress since {started_at}")]
    FastAlreadyActive { started_at: DateTime<Utc> },

    #[error("Weight must be a positive number, got {0}")]
    InvalidWeight(f64),

    #[error("Weight entry '{0}' not found")]
    WeightEntryNotFound(String),

    #[error("Invalid weight goal: {0}")]
    InvalidGoal(String),
}
