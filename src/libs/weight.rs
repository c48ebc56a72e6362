//! Weight tracking store.
//!
//! Keeps body-weight measurements (most recent first), an optional goal, the
//! user's preferred display unit and health-import metadata. Like the fasting
//! store, every mutation persists the whole [`WeightState`] and then notifies
//! subscribers; storage failures are logged, never returned.
//!
//! ## Computed views
//!
//! All views are expressed in the preferred unit, whatever unit each entry
//! was recorded in.
//!
//! - [`WeightStore::current_weight`]: the most recent entry.
//! - [`WeightStore::weight_change`]: current minus the starting weight, which
//!   is the oldest entry on or after the goal's start date (or the oldest
//!   entry overall when there is no goal).
//! - [`WeightStore::progress_percentage`]: share of the way from the starting
//!   weight to the goal, clamped to `[0, 100]`.
//! - [`WeightStore::average_weekly_change`]: least-squares trend over the last
//!   28 days, or over the whole history when the window has fewer than two
//!   points.
//! - [`WeightStore::predicted_goal_date`]: linear extrapolation of that trend.

use crate::libs::clock::Clock;
use crate::libs::data_storage::StateStore;
use crate::libs::error::FastingError;
use crate::libs::observer::{Observers, SubscriptionId};
use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Storage key of the weight state document.
pub const WEIGHT_STATE_KEY: &str = "weight-state";

/// Days of history considered by the weekly trend.
pub const TREND_WINDOW_DAYS: i64 = 28;

const KG_PER_LB: f64 = 0.453_592_37;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    /// Converts `value` expressed in this unit into `target`.
    pub fn convert(&self, value: f64, target: WeightUnit) -> f64 {
        if *self == target {
            value
        } else {
            target.from_kg(self.to_kg(value))
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Lbs => write!(f, "lbs"),
            WeightUnit::Kg => write!(f, "kg"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            other => Err(format!("Unknown weight unit: {}", other)),
        }
    }
}

/// Where a measurement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    #[default]
    Manual,
    AppleHealth,
}

impl fmt::Display for WeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSource::Manual => write!(f, "manual"),
            WeightSource::AppleHealth => write!(f, "apple_health"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: String,
    pub weight: f64,
    pub unit: WeightUnit,
    #[serde(with = "ts_milliseconds")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub source: WeightSource,
}

impl WeightEntry {
    pub fn weight_in(&self, unit: WeightUnit) -> f64 {
        self.unit.convert(self.weight, unit)
    }
}

/// A measurement before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeight {
    pub weight: f64,
    pub unit: WeightUnit,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightGoal {
    pub target_weight: f64,
    pub unit: WeightUnit,
    #[serde(with = "ts_milliseconds")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "ts_milliseconds_option")]
    pub target_date: Option<DateTime<Utc>>,
}

impl WeightGoal {
    pub fn target_in(&self, unit: WeightUnit) -> f64 {
        self.unit.convert(self.target_weight, unit)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthSyncMeta {
    pub enabled: bool,
    #[serde(with = "ts_milliseconds_option")]
    pub last_import: Option<DateTime<Utc>>,
    pub imported_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightState {
    /// Measurements, most recent first.
    pub entries: Vec<WeightEntry>,
    pub goal: Option<WeightGoal>,
    /// Unit used for display and computed views.
    pub unit: WeightUnit,
    pub health_sync: HealthSyncMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub imported: usize,
    /// Entries dropped because a measurement with the same date already exists.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalPrediction {
    /// The current weight already meets the goal.
    Reached,
    /// Expected date the goal is reached at the current trend.
    On(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeightEvent {
    EntryAdded(WeightEntry),
    EntryDeleted(WeightEntry),
    GoalChanged(Option<WeightGoal>),
    UnitChanged(WeightUnit),
    Imported(ImportSummary),
}

pub struct WeightStore {
    state: WeightState,
    storage: Box<dyn StateStore>,
    clock: Arc<dyn Clock>,
    observers: Observers<WeightEvent>,
}

impl WeightStore {
    pub fn open(storage: Box<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        let state = load_state(storage.as_ref());
        Self {
            state,
            storage,
            clock,
            observers: Observers::new(),
        }
    }

    pub fn reload(&mut self) {
        self.state = load_state(self.storage.as_ref());
    }

    pub fn state(&self) -> &WeightState {
        &self.state
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.state.entries
    }

    pub fn goal(&self) -> Option<&WeightGoal> {
        self.state.goal.as_ref()
    }

    pub fn unit(&self) -> WeightUnit {
        self.state.unit
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&WeightEvent) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Records a measurement, keeping entries sorted most recent first.
    pub fn add_entry(&mut self, new: NewWeight, source: WeightSource) -> Result<WeightEntry, FastingError> {
        let entry = build_entry(new, source)?;
        self.insert_sorted(entry.clone());

        debug!(entry_id = %entry.id, weight = entry.weight, "weight entry added");
        self.persist();
        self.observers.notify(&WeightEvent::EntryAdded(entry.clone()));
        Ok(entry)
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<WeightEntry, FastingError> {
        let position = self
            .state
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| FastingError::WeightEntryNotFound(id.to_string()))?;
        let removed = self.state.entries.remove(position);

        self.persist();
        self.observers.notify(&WeightEvent::EntryDeleted(removed.clone()));
        Ok(removed)
    }

    /// Replaces any existing goal.
    pub fn set_goal(&mut self, goal: WeightGoal) -> Result<(), FastingError> {
        if !goal.target_weight.is_finite() || goal.target_weight <= 0.0 {
            return Err(FastingError::InvalidGoal(format!("target weight must be positive, got {}", goal.target_weight)));
        }
        if let Some(target_date) = goal.target_date {
            if target_date <= goal.start_date {
                return Err(FastingError::InvalidGoal("target date must be after the start date".to_string()));
            }
        }

        self.state.goal = Some(goal);
        self.persist();
        self.observers.notify(&WeightEvent::GoalChanged(self.state.goal.clone()));
        Ok(())
    }

    pub fn clear_goal(&mut self) -> Option<WeightGoal> {
        let previous = self.state.goal.take()?;
        self.persist();
        self.observers.notify(&WeightEvent::GoalChanged(None));
        Some(previous)
    }

    pub fn set_unit(&mut self, unit: WeightUnit) {
        self.state.unit = unit;
        self.persist();
        self.observers.notify(&WeightEvent::UnitChanged(unit));
    }

    pub fn set_health_sync_enabled(&mut self, enabled: bool) {
        self.state.health_sync.enabled = enabled;
        self.persist();
    }

    /// Merges externally sourced measurements.
    ///
    /// The measurement date is the dedup key: anything whose date matches an
    /// existing entry (or an earlier entry of the same batch) is skipped, as
    /// are invalid weights.
    pub fn import_entries(&mut self, batch: Vec<NewWeight>, source: WeightSource) -> ImportSummary {
        let mut known_dates: HashSet<DateTime<Utc>> = self.state.entries.iter().map(|entry| entry.date).collect();
        let mut summary = ImportSummary::default();

        for new in batch {
            if !known_dates.insert(new.date) {
                summary.skipped += 1;
                continue;
            }
            match build_entry(new, source) {
                Ok(entry) => {
                    self.insert_sorted(entry);
                    summary.imported += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping invalid imported weight");
                    summary.skipped += 1;
                }
            }
        }

        self.state.health_sync.last_import = Some(self.clock.now());
        self.state.health_sync.imported_count += summary.imported;
        debug!(imported = summary.imported, skipped = summary.skipped, "weight import finished");
        self.persist();
        self.observers.notify(&WeightEvent::Imported(summary));
        summary
    }

    /// Most recent weight in the preferred unit.
    pub fn current_weight(&self) -> Option<f64> {
        self.state.entries.first().map(|entry| entry.weight_in(self.state.unit))
    }

    /// Weight the current progress is measured from.
    pub fn start_weight(&self) -> Option<f64> {
        let entries = &self.state.entries;
        let start = self
            .state
            .goal
            .as_ref()
            .and_then(|goal| entries.iter().rev().find(|entry| entry.date >= goal.start_date))
            .or_else(|| entries.last())?;
        Some(start.weight_in(self.state.unit))
    }

    /// Current weight minus the starting weight; needs at least two entries.
    pub fn weight_change(&self) -> Option<f64> {
        if self.state.entries.len() < 2 {
            return None;
        }
        Some(self.current_weight()? - self.start_weight()?)
    }

    /// How far the current weight has moved from the start toward the goal.
    pub fn progress_percentage(&self) -> Option<f64> {
        let goal = self.state.goal.as_ref()?;
        let current = self.current_weight()?;
        let start = self.start_weight()?;
        let target = goal.target_in(self.state.unit);

        let total_change = target - start;
        if total_change == 0.0 {
            return Some(100.0);
        }
        let current_change = current - start;
        Some((current_change / total_change * 100.0).clamp(0.0, 100.0))
    }

    /// Trend in the preferred unit per week.
    pub fn average_weekly_change(&self) -> Option<f64> {
        let entries = &self.state.entries;
        if entries.len() < 2 {
            return None;
        }

        let window_start = self.clock.now() - Duration::days(TREND_WINDOW_DAYS);
        let recent: Vec<&WeightEntry> = entries.iter().filter(|entry| entry.date >= window_start).collect();
        let points: Vec<&WeightEntry> = if recent.len() >= 2 { recent } else { entries.iter().collect() };

        weekly_slope(&points, self.state.unit)
    }

    pub fn predicted_goal_date(&self) -> Option<GoalPrediction> {
        let goal = self.state.goal.as_ref()?;
        let current = self.current_weight()?;
        let start = self.start_weight()?;
        let target = goal.target_in(self.state.unit);

        let reached = if target < start {
            current <= target
        } else if target > start {
            current >= target
        } else {
            true
        };
        if reached {
            return Some(GoalPrediction::Reached);
        }

        let rate = self.average_weekly_change()?;
        let remaining = target - current;
        if rate == 0.0 || remaining.signum() != rate.signum() {
            return None;
        }

        // A nearly flat trend projects past what chrono can represent.
        let millis = (remaining / rate * 7.0 * MILLIS_PER_DAY).round();
        if !millis.is_finite() || millis >= i64::MAX as f64 {
            return None;
        }
        let delta = Duration::try_milliseconds(millis as i64)?;
        self.clock.now().checked_add_signed(delta).map(GoalPrediction::On)
    }

    fn insert_sorted(&mut self, entry: WeightEntry) {
        let position = self.state.entries.partition_point(|existing| existing.date > entry.date);
        self.state.entries.insert(position, entry);
    }

    fn persist(&self) {
        match serde_json::to_string(&self.state) {
            Ok(json) => {
                if let Err(e) = self.storage.save(WEIGHT_STATE_KEY, &json) {
                    warn!(key = WEIGHT_STATE_KEY, error = %e, "failed to persist weight state");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize weight state"),
        }
    }
}

fn build_entry(new: NewWeight, source: WeightSource) -> Result<WeightEntry, FastingError> {
    if !new.weight.is_finite() || new.weight <= 0.0 {
        return Err(FastingError::InvalidWeight(new.weight));
    }
    Ok(WeightEntry {
        id: Uuid::now_v7().to_string(),
        weight: new.weight,
        unit: new.unit,
        date: new.date,
        note: new.note.filter(|note| !note.trim().is_empty()),
        source,
    })
}

/// Least-squares slope of weight over time, scaled to one week.
fn weekly_slope(points: &[&WeightEntry], unit: WeightUnit) -> Option<f64> {
    let origin = points.iter().map(|entry| entry.date).min()?;
    let samples: Vec<(f64, f64)> = points
        .iter()
        .map(|entry| ((entry.date - origin).num_milliseconds() as f64 / MILLIS_PER_DAY, entry.weight_in(unit)))
        .collect();

    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;
    let covariance: f64 = samples.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let variance: f64 = samples.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();

    if variance <= f64::EPSILON {
        return None;
    }
    Some(covariance / variance * 7.0)
}

fn load_state(storage: &dyn StateStore) -> WeightState {
    match storage.load(WEIGHT_STATE_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(key = WEIGHT_STATE_KEY, error = %e, "stored weight state is unreadable, starting fresh");
            WeightState::default()
        }),
        Ok(None) => WeightState::default(),
        Err(e) => {
            warn!(key = WEIGHT_STATE_KEY, error = %e, "failed to load weight state, starting fresh");
            WeightState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversion_round_trips() {
        let kg = WeightUnit::Lbs.convert(150.0, WeightUnit::Kg);
        assert!((kg - 68.038_855_5).abs() < 1e-6);
        assert!((WeightUnit::Kg.convert(kg, WeightUnit::Lbs) - 150.0).abs() < 1e-9);
        assert_eq!(WeightUnit::Kg.convert(70.0, WeightUnit::Kg), 70.0);
    }

    #[test]
    fn unit_parsing_accepts_aliases() {
        assert_eq!("LB".parse::<WeightUnit>(), Ok(WeightUnit::Lbs));
        assert_eq!("kilograms".parse::<WeightUnit>(), Ok(WeightUnit::Kg));
        assert!("stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&WeightSource::AppleHealth).unwrap(), "\"apple_health\"");
        assert_eq!(WeightSource::AppleHealth.to_string(), "apple_health");
    }
}
