//! Live timer for the fast in progress.
//!
//! [`TimerState::step`] is the pure part: given the store it works out what
//! changed since the previous tick and returns the resulting [`TimerEvent`]s.
//! [`FastTimer`] drives it from a tokio interval, reloading the persisted
//! state each tick so that `pause`/`end` issued from another terminal are
//! picked up.

use crate::libs::fast::{crossed_milestones, FastStatus};
use crate::libs::fasting::FastingStore;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub tick_interval_ms: u64,
    /// Running ticks between two elapsed-time checkpoints.
    pub checkpoint_every: u32,
    /// Elapsed hours announced while fasting.
    pub milestones: Vec<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            checkpoint_every: 30,
            milestones: vec![12, 16, 18, 20, 24],
        }
    }
}

impl TimerConfig {
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// What the display needs for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub fast_id: String,
    pub status: FastStatus,
    pub elapsed: Duration,
    pub remaining: Duration,
    pub progress: f64,
    pub target_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Tick(TimerSnapshot),
    Milestone(u32),
    TargetReached,
    Paused,
    Resumed,
    /// The fast being watched is no longer current.
    Ended,
}

#[derive(Debug, Clone, Default)]
pub struct TimerState {
    fast_id: Option<String>,
    last_elapsed: Duration,
    last_status: Option<FastStatus>,
    target_announced: bool,
    ticks_since_checkpoint: u32,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the timer by one tick.
    ///
    /// A fast seen for the first time only produces a `Tick`: milestones it
    /// already passed are not announced retroactively.
    pub fn step(&mut self, store: &FastingStore, config: &TimerConfig) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let now = store.now();

        let Some(fast) = store.current() else {
            if self.fast_id.take().is_some() {
                events.push(TimerEvent::Ended);
            }
            *self = Self::default();
            return events;
        };

        let status = store.status();
        let elapsed = fast.elapsed_at(now);

        if self.fast_id.as_deref() != Some(fast.id.as_str()) {
            if self.fast_id.is_some() {
                events.push(TimerEvent::Ended);
            }
            *self = Self {
                fast_id: Some(fast.id.clone()),
                last_elapsed: elapsed,
                last_status: Some(status),
                target_announced: elapsed >= fast.planned_duration,
                ticks_since_checkpoint: 0,
            };
        } else {
            match (self.last_status, status) {
                (Some(FastStatus::Running), FastStatus::Paused) => events.push(TimerEvent::Paused),
                (Some(FastStatus::Paused), FastStatus::Running) => events.push(TimerEvent::Resumed),
                _ => {}
            }
            events.extend(
                crossed_milestones(self.last_elapsed, elapsed, &config.milestones)
                    .into_iter()
                    .map(TimerEvent::Milestone),
            );
            if !self.target_announced && elapsed >= fast.planned_duration {
                self.target_announced = true;
                events.push(TimerEvent::TargetReached);
            }
            self.last_elapsed = elapsed;
            self.last_status = Some(status);
        }

        events.push(TimerEvent::Tick(TimerSnapshot {
            fast_id: fast.id.clone(),
            status,
            elapsed,
            remaining: fast.remaining_at(now),
            progress: fast.progress_at(now),
            target_time: fast.target_time_at(now),
        }));

        if status == FastStatus::Running {
            self.ticks_since_checkpoint += 1;
            if self.ticks_since_checkpoint >= config.checkpoint_every.max(1) {
                self.ticks_since_checkpoint = 0;
                if let Some(checkpoint) = store.checkpoint() {
                    debug!(fast_id = %checkpoint.fast_id, elapsed_ms = checkpoint.elapsed.num_milliseconds(), "timer checkpoint");
                }
            }
        }

        events
    }
}

pub struct FastTimer {
    config: TimerConfig,
    state: TimerState,
}

impl FastTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::new(),
        }
    }

    /// Ticks until the slot is empty or Ctrl+C is pressed.
    pub async fn run<F>(&mut self, store: &mut FastingStore, mut on_event: F) -> Result<()>
    where
        F: FnMut(&TimerEvent),
    {
        let mut interval = time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    store.reload();
                    for event in self.state.step(store, &self.config) {
                        on_event(&event);
                    }
                    if store.current().is_none() {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    store.checkpoint();
                    debug!("timer interrupted");
                    break;
                }
            }
        }
        Ok(())
    }
}
