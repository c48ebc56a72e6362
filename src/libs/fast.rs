//! Fasting session records.
//!
//! A fast in progress is an [`ActiveFast`] whose [`ActiveState`] is either
//! running or paused. Ending it turns it into a [`CompletedFast`], a separate
//! type that always carries an end time, so a record can never be both paused
//! and finished.
//!
//! ## Timing model
//!
//! `start_time` never changes once set. Pausing freezes the elapsed value:
//! the time spent paused is accumulated in `paused_total` and subtracted, so
//!
//! ```text
//! elapsed = (paused_at | now) - start_time - paused_total
//! ```

use crate::libs::progress::progress;
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serde helpers storing a `chrono::Duration` as whole milliseconds.
pub(crate) mod duration_ms {
    use chrono::Duration;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = i64::deserialize(deserializer)?;
        Duration::try_milliseconds(ms).ok_or_else(|| D::Error::custom(format!("duration of {ms} ms is out of range")))
    }
}

/// Whether the current fast is ticking or on hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ActiveState {
    Running,
    Paused {
        #[serde(rename = "pausedAt", with = "ts_milliseconds")]
        paused_at: DateTime<Utc>,
    },
}

/// The fast currently in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFast {
    pub id: String,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "duration_ms")]
    pub planned_duration: Duration,
    #[serde(default)]
    pub plan: Option<String>,
    /// Time spent in completed pauses.
    #[serde(with = "duration_ms", default = "Duration::zero")]
    pub paused_total: Duration,
    pub state: ActiveState,
}

impl ActiveFast {
    pub fn new(id: String, start_time: DateTime<Utc>, planned_duration: Duration, plan: Option<String>) -> Self {
        Self {
            id,
            start_time,
            planned_duration,
            plan,
            paused_total: Duration::zero(),
            state: ActiveState::Running,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ActiveState::Paused { .. })
    }

    /// Fasting time accrued up to `now`, excluding pauses.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        let until = match self.state {
            ActiveState::Running => now,
            ActiveState::Paused { paused_at } => paused_at,
        };
        (until - self.start_time - self.paused_total).max(Duration::zero())
    }

    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        progress(self.elapsed_at(now), self.planned_duration)
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.planned_duration - self.elapsed_at(now)).max(Duration::zero())
    }

    /// When the planned duration will be reached if the fast keeps running from `now`.
    pub fn target_time_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.remaining_at(now)
    }

    /// Puts a running fast on hold. Returns `false` if it was already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            ActiveState::Running => {
                self.state = ActiveState::Paused { paused_at: now };
                true
            }
            ActiveState::Paused { .. } => false,
        }
    }

    /// Resumes a paused fast. Returns `false` if it was not paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            ActiveState::Paused { paused_at } => {
                self.paused_total += (now - paused_at).max(Duration::zero());
                self.state = ActiveState::Running;
                true
            }
            ActiveState::Running => false,
        }
    }

    /// Freezes the fast into a history record ending at `now`.
    ///
    /// An open pause is closed first, so its time does not count as fasting.
    pub fn finish(mut self, now: DateTime<Utc>) -> CompletedFast {
        self.resume(now);
        CompletedFast {
            id: self.id,
            start_time: self.start_time,
            end_time: now.max(self.start_time),
            planned_duration: self.planned_duration,
            plan: self.plan,
            paused_total: self.paused_total,
        }
    }
}

/// A fast that was explicitly ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedFast {
    pub id: String,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    #[serde(with = "duration_ms")]
    pub planned_duration: Duration,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(with = "duration_ms", default = "Duration::zero")]
    pub paused_total: Duration,
}

impl CompletedFast {
    /// Fasting time, excluding pauses.
    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time - self.paused_total).max(Duration::zero())
    }

    pub fn reached_target(&self) -> bool {
        self.duration() >= self.planned_duration
    }

    pub fn progress(&self) -> f64 {
        progress(self.duration(), self.planned_duration)
    }
}

/// Coarse lifecycle view of the current slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastStatus {
    Idle,
    Running,
    Paused,
}

impl FastStatus {
    pub fn of(current: Option<&ActiveFast>) -> Self {
        match current.map(|fast| fast.state) {
            None => FastStatus::Idle,
            Some(ActiveState::Running) => FastStatus::Running,
            Some(ActiveState::Paused { .. }) => FastStatus::Paused,
        }
    }
}

/// Milestone hours passed when elapsed time moves from `previous` to `current`.
///
/// A milestone counts as crossed when `previous < milestone <= current`.
pub fn crossed_milestones(previous: Duration, current: Duration, milestones: &[u32]) -> Vec<u32> {
    milestones
        .iter()
        .copied()
        .filter(|hours| {
            let at = Duration::hours(*hours as i64);
            previous < at && at <= current
        })
        .collect()
}

/// Aggregates over the fasting history.
#[derive(Debug, Clone, PartialEq)]
pub struct FastingStats {
    pub total_fasts: usize,
    pub reached_target: usize,
    pub longest: Duration,
    pub average: Duration,
    pub total_time: Duration,
    /// Consecutive days, ending today or yesterday, with a fast that reached its target.
    pub current_streak: u32,
}

impl FastingStats {
    /// Statistics with days counted in the local timezone.
    pub fn from_history(history: &[CompletedFast], now: DateTime<Utc>) -> Self {
        Self::from_history_in(history, now.with_timezone(&Local))
    }

    pub fn from_history_in<Tz: TimeZone>(history: &[CompletedFast], now: DateTime<Tz>) -> Self {
        let total_time = history.iter().fold(Duration::zero(), |acc, fast| acc + fast.duration());
        let longest = history.iter().map(CompletedFast::duration).max().unwrap_or_else(Duration::zero);
        let average = match history.len() {
            0 => Duration::zero(),
            n => Duration::milliseconds(total_time.num_milliseconds() / n as i64),
        };

        let tz = now.timezone();
        let reached_days: HashSet<NaiveDate> = history
            .iter()
            .filter(|fast| fast.reached_target())
            .map(|fast| fast.end_time.with_timezone(&tz).date_naive())
            .collect();

        Self {
            total_fasts: history.len(),
            reached_target: history.iter().filter(|fast| fast.reached_target()).count(),
            longest,
            average,
            total_time,
            current_streak: streak_ending_at(&reached_days, now.date_naive()),
        }
    }
}

fn streak_ending_at(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap() + Duration::hours(hours)
    }

    fn fast() -> ActiveFast {
        ActiveFast::new("f1".to_string(), at(0), Duration::hours(16), Some("16:8".to_string()))
    }

    #[test]
    fn elapsed_freezes_while_paused() {
        let mut fast = fast();
        assert!(fast.pause(at(4)));
        assert_eq!(fast.elapsed_at(at(10)), Duration::hours(4));
        assert!(fast.resume(at(6)));
        assert_eq!(fast.paused_total, Duration::hours(2));
        assert_eq!(fast.elapsed_at(at(10)), Duration::hours(8));
        assert_eq!(fast.progress_at(at(10)), 50.0);
    }

    #[test]
    fn pause_and_resume_are_not_reentrant() {
        let mut fast = fast();
        assert!(!fast.resume(at(1)));
        assert!(fast.pause(at(1)));
        assert!(!fast.pause(at(2)));
        assert_eq!(fast.state, ActiveState::Paused { paused_at: at(1) });
    }

    #[test]
    fn finishing_while_paused_closes_the_pause() {
        let mut fast = fast();
        fast.pause(at(10));
        let done = fast.finish(at(12));
        assert_eq!(done.end_time, at(12));
        assert_eq!(done.duration(), Duration::hours(10));
        assert!(!done.reached_target());
    }

    #[test]
    fn target_time_moves_with_pauses() {
        let mut fast = fast();
        assert_eq!(fast.target_time_at(at(1)), at(16));
        fast.pause(at(2));
        fast.resume(at(5));
        assert_eq!(fast.target_time_at(at(5)), at(19));
    }

    #[test]
    fn status_reflects_slot() {
        let mut fast = fast();
        assert_eq!(FastStatus::of(None), FastStatus::Idle);
        assert_eq!(FastStatus::of(Some(&fast)), FastStatus::Running);
        fast.pause(at(1));
        assert_eq!(FastStatus::of(Some(&fast)), FastStatus::Paused);
    }

    #[test]
    fn milestones_cross_once() {
        let milestones = [12, 16, 18];
        assert_eq!(crossed_milestones(Duration::hours(11), Duration::hours(12), &milestones), vec![12]);
        assert!(crossed_milestones(Duration::hours(12), Duration::hours(13), &milestones).is_empty());
        assert_eq!(crossed_milestones(Duration::hours(10), Duration::hours(17), &milestones), vec![12, 16]);
    }

    #[test]
    fn stats_count_streak_and_totals() {
        let mk = |day: i64, hours: i64| CompletedFast {
            id: format!("d{day}"),
            start_time: at(day * 24),
            end_time: at(day * 24 + hours),
            planned_duration: Duration::hours(16),
            plan: None,
            paused_total: Duration::zero(),
        };
        let history = vec![mk(3, 17), mk(2, 16), mk(1, 10), mk(0, 16)];
        let stats = FastingStats::from_history_in(&history, at(3 * 24 + 20));

        assert_eq!(stats.total_fasts, 4);
        assert_eq!(stats.reached_target, 3);
        assert_eq!(stats.longest, Duration::hours(17));
        assert_eq!(stats.total_time, Duration::hours(59));
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn active_fast_serializes_with_tagged_state() {
        let mut fast = fast();
        fast.pause(at(1));
        let json = serde_json::to_value(&fast).unwrap();
        assert_eq!(json["state"]["status"], "paused");
        assert_eq!(json["plannedDuration"], 57_600_000);
        let back: ActiveFast = serde_json::from_value(json).unwrap();
        assert_eq!(back, fast);
    }
}
