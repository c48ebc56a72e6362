//! Fasting session store.
//!
//! [`FastingStore`] owns the single current-fast slot, the history of
//! completed fasts and the user's [`Preferences`]. Every mutation updates the
//! in-memory [`FastingState`], writes the whole state to the [`StateStore`]
//! and then notifies subscribers.
//!
//! ## Lifecycle
//!
//! ```text
//!            start_fast / replace_fast
//!   Idle ─────────────────────────────▶ Running ◀──┐
//!    ▲                                    │        │ pause_fast
//!    │ end_fast (history += fast)         ▼        │ (toggle)
//!    └────────────────────────────────── Paused ───┘
//!    ▲
//!    └── discard_fast / update_plan / replace_fast (no history)
//! ```
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! state stays authoritative, so callers never see storage errors from
//! lifecycle operations.

use crate::libs::clock::Clock;
use crate::libs::data_storage::StateStore;
use crate::libs::error::FastingError;
use crate::libs::fast::{duration_ms, ActiveFast, CompletedFast, FastStatus, FastingStats};
use crate::libs::observer::{Observers, SubscriptionId};
use crate::libs::plan::{resolve_duration, validate_custom_hours, validate_plan, CUSTOM_PLAN, DEFAULT_FASTING_HOURS};
use crate::libs::preferences::Preferences;
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Storage key of the fasting state document.
pub const FASTING_STATE_KEY: &str = "fasting-state";

/// Storage key of the timer's elapsed-time checkpoint.
pub const TIMER_CHECKPOINT_KEY: &str = "timer-checkpoint";

/// Everything the fasting store persists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FastingState {
    pub current_fast: Option<ActiveFast>,
    /// Completed fasts, most recent first.
    pub history: Vec<CompletedFast>,
    pub preferences: Preferences,
}

/// Last elapsed value written by the timer for a running fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerCheckpoint {
    pub fast_id: String,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    #[serde(with = "ts_milliseconds")]
    pub recorded_at: DateTime<Utc>,
}

/// What a new fast should last.
#[derive(Debug, Clone, PartialEq)]
pub enum FastTarget {
    /// The plan stored in preferences.
    Selected,
    /// A plan identifier, resolved through the duration resolver.
    Plan(String),
    /// An explicit planned duration, used verbatim.
    Duration(Duration),
}

/// Notifications published after each successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FastEvent {
    Started(ActiveFast),
    /// The current fast was dropped without being recorded.
    Discarded(ActiveFast),
    Paused(ActiveFast),
    Resumed(ActiveFast),
    Ended(CompletedFast),
    PreferencesChanged(Preferences),
}

/// Owner of the current-fast slot, fast history and preferences.
///
/// ## Invariants
///
/// - At most one fast is in progress; [`start_fast`](Self::start_fast) refuses a second
/// - History is ordered most recent first and only grows through [`end_fast`](Self::end_fast)
/// - Every mutation is persisted before subscribers are notified
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use fastline::libs::clock::MockClock;
/// use fastline::libs::data_storage::MemoryStateStore;
/// use fastline::libs::fasting::{FastTarget, FastingStore};
/// use std::sync::Arc;
///
/// let clock = MockClock::at_millis(1_700_000_000_000);
/// let mut store = FastingStore::open(Box::new(MemoryStateStore::new()), Arc::new(clock.clone()));
///
/// store.start_fast(FastTarget::Plan("16:8".to_string()))?;
/// clock.advance(Duration::hours(8));
/// assert_eq!(store.progress(), 50.0);
///
/// let completed = store.end_fast().unwrap();
/// assert_eq!(store.history()[0], completed);
/// # Ok::<(), fastline::libs::error::FastingError>(())
/// ```
pub struct FastingStore {
    state: FastingState,
    storage: Box<dyn StateStore>,
    clock: Arc<dyn Clock>,
    observers: Observers<FastEvent>,
}

impl FastingStore {
    /// Opens the store, loading any previously persisted state.
    ///
    /// Missing or unreadable state starts from defaults.
    pub fn open(storage: Box<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        let state = load_state(storage.as_ref());
        Self {
            state,
            storage,
            clock,
            observers: Observers::new(),
        }
    }

    /// Re-reads the persisted state, picking up changes written by another process.
    pub fn reload(&mut self) {
        self.state = load_state(self.storage.as_ref());
    }

    /// The full persisted state, as written to storage.
    pub fn state(&self) -> &FastingState {
        &self.state
    }

    pub fn current(&self) -> Option<&ActiveFast> {
        self.state.current_fast.as_ref()
    }

    pub fn history(&self) -> &[CompletedFast] {
        &self.state.history
    }

    pub fn preferences(&self) -> &Preferences {
        &self.state.preferences
    }

    pub fn status(&self) -> FastStatus {
        FastStatus::of(self.current())
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Elapsed fasting time of the current fast, zero when idle.
    pub fn elapsed(&self) -> Duration {
        self.current().map(|fast| fast.elapsed_at(self.now())).unwrap_or_else(Duration::zero)
    }

    /// Percent-complete of the current fast, zero when idle.
    pub fn progress(&self) -> f64 {
        self.current().map(|fast| fast.progress_at(self.now())).unwrap_or(0.0)
    }

    pub fn stats(&self) -> FastingStats {
        FastingStats::from_history(&self.state.history, self.now())
    }

    /// Registers a callback invoked after each persisted mutation.
    ///
    /// Callbacks run synchronously on the mutating call, in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&FastEvent) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Starts a new fast.
    ///
    /// Refuses to clobber a fast that is already in progress; use
    /// [`FastingStore::replace_fast`] to discard it explicitly.
    pub fn start_fast(&mut self, target: FastTarget) -> Result<ActiveFast, FastingError> {
        if let Some(current) = self.current() {
            return Err(FastingError::FastAlreadyActive {
                started_at: current.start_time,
            });
        }
        Ok(self.begin(target))
    }

    /// Discards any fast in progress, without recording it, and starts a new one.
    pub fn replace_fast(&mut self, target: FastTarget) -> ActiveFast {
        self.discard_fast();
        self.begin(target)
    }

    /// Toggles between running and paused.
    ///
    /// Returns the resulting status, or `None` when there is no fast to pause.
    pub fn pause_fast(&mut self) -> Option<FastStatus> {
        let now = self.now();
        let fast = self.state.current_fast.as_mut()?;

        let event = if fast.is_paused() {
            fast.resume(now);
            FastEvent::Resumed(fast.clone())
        } else {
            fast.pause(now);
            FastEvent::Paused(fast.clone())
        };
        let status = FastStatus::of(Some(&*fast));

        self.persist();
        self.observers.notify(&event);
        Some(status)
    }

    /// Ends the current fast and moves it to the front of history.
    ///
    /// Without a current fast this is a no-op and returns `None`.
    pub fn end_fast(&mut self) -> Option<CompletedFast> {
        let now = self.now();
        let fast = self.state.current_fast.take()?;
        let completed = fast.finish(now);
        self.state.history.insert(0, completed.clone());

        debug!(fast_id = %completed.id, duration_ms = completed.duration().num_milliseconds(), "fast ended");
        self.persist();
        self.observers.notify(&FastEvent::Ended(completed.clone()));
        Some(completed)
    }

    /// Drops the current fast without recording it.
    pub fn discard_fast(&mut self) -> Option<ActiveFast> {
        let discarded = self.state.current_fast.take()?;

        debug!(fast_id = %discarded.id, "fast discarded");
        self.persist();
        self.observers.notify(&FastEvent::Discarded(discarded.clone()));
        Some(discarded)
    }

    /// Switches the selected plan.
    ///
    /// A fast in progress is discarded first and returned; confirming that
    /// with the user is the caller's job.
    pub fn update_plan(&mut self, plan: &str) -> Result<Option<ActiveFast>, FastingError> {
        validate_plan(plan)?;
        let discarded = self.discard_fast();
        self.update_preferences(|prefs| prefs.selected_plan = plan.to_string());
        Ok(discarded)
    }

    /// Stores the custom plan length after checking it against the allowed range.
    pub fn set_custom_duration(&mut self, hours: f64) -> Result<(), FastingError> {
        let hours = validate_custom_hours(hours)?;
        self.update_preferences(|prefs| prefs.custom_duration = hours);
        Ok(())
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.update_preferences(|prefs| prefs.notifications_enabled = enabled);
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.update_preferences(|prefs| prefs.dark_mode = enabled);
    }

    pub fn set_onboarding_complete(&mut self, complete: bool) {
        self.update_preferences(|prefs| prefs.onboarding_complete = complete);
    }

    pub fn set_premium(&mut self, premium: bool) {
        self.update_preferences(|prefs| prefs.is_premium = premium);
    }

    /// Records the current elapsed value under [`TIMER_CHECKPOINT_KEY`].
    ///
    /// Kept apart from the main state document so the timer never overwrites
    /// lifecycle changes made elsewhere.
    pub fn checkpoint(&self) -> Option<TimerCheckpoint> {
        let now = self.now();
        let fast = self.current()?;
        let checkpoint = TimerCheckpoint {
            fast_id: fast.id.clone(),
            elapsed: fast.elapsed_at(now),
            recorded_at: now,
        };

        match serde_json::to_string(&checkpoint) {
            Ok(json) => {
                if let Err(e) = self.storage.save(TIMER_CHECKPOINT_KEY, &json) {
                    warn!(key = TIMER_CHECKPOINT_KEY, error = %e, "failed to persist timer checkpoint");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize timer checkpoint"),
        }
        Some(checkpoint)
    }

    /// The last checkpoint, if it belongs to the current fast.
    pub fn last_checkpoint(&self) -> Option<TimerCheckpoint> {
        let fast = self.current()?;
        let json = self.storage.load(TIMER_CHECKPOINT_KEY).ok().flatten()?;
        let checkpoint: TimerCheckpoint = serde_json::from_str(&json).ok()?;
        (checkpoint.fast_id == fast.id).then_some(checkpoint)
    }

    fn begin(&mut self, target: FastTarget) -> ActiveFast {
        let (planned_duration, plan) = self.resolve_target(target);
        let fast = ActiveFast::new(Uuid::now_v7().to_string(), self.now(), planned_duration, plan);
        self.state.current_fast = Some(fast.clone());

        debug!(fast_id = %fast.id, planned_ms = planned_duration.num_milliseconds(), "fast started");
        self.persist();
        self.observers.notify(&FastEvent::Started(fast.clone()));
        fast
    }

    fn resolve_target(&self, target: FastTarget) -> (Duration, Option<String>) {
        let prefs = &self.state.preferences;
        match target {
            FastTarget::Selected => {
                let plan = prefs.selected_plan.clone();
                (resolve_duration(&plan, Some(prefs.custom_duration)), Some(plan))
            }
            FastTarget::Plan(plan) => (resolve_duration(&plan, Some(prefs.custom_duration)), Some(plan)),
            FastTarget::Duration(duration) if duration > Duration::zero() => (duration, Some(CUSTOM_PLAN.to_string())),
            FastTarget::Duration(duration) => {
                warn!(duration_ms = duration.num_milliseconds(), "non-positive planned duration, falling back to default");
                (resolve_duration(CUSTOM_PLAN, Some(DEFAULT_FASTING_HOURS)), Some(CUSTOM_PLAN.to_string()))
            }
        }
    }

    fn update_preferences<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Preferences),
    {
        change(&mut self.state.preferences);
        self.persist();
        self.observers.notify(&FastEvent::PreferencesChanged(self.state.preferences.clone()));
    }

    fn persist(&self) {
        match serde_json::to_string(&self.state) {
            Ok(json) => {
                if let Err(e) = self.storage.save(FASTING_STATE_KEY, &json) {
                    warn!(key = FASTING_STATE_KEY, error = %e, "failed to persist fasting state");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize fasting state"),
        }
    }
}

fn load_state(storage: &dyn StateStore) -> FastingState {
    match storage.load(FASTING_STATE_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(key = FASTING_STATE_KEY, error = %e, "stored fasting state is unreadable, starting fresh");
            FastingState::default()
        }),
        Ok(None) => FastingState::default(),
        Err(e) => {
            warn!(key = FASTING_STATE_KEY, error = %e, "failed to load fasting state, starting fresh");
            FastingState::default()
        }
    }
}
