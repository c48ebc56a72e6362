//! Display implementation for fastline messages.
//!
//! All user-facing text lives in this one `match`, so wording stays
//! consistent and every new [`Message`] variant needs an explicit rendering.
//! Parameters are interpolated as already-formatted strings (durations,
//! clock times) by the caller; numbers that need rounding are rounded here.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === FASTING MESSAGES ===
            Message::FastStarted(plan, duration, ends_at) => {
                format!("Fast started on plan {} ({}), target at {}", plan, duration, ends_at)
            }
            Message::FastReplaced(elapsed) => format!("Discarded the fast in progress after {}", elapsed),
            Message::FastPaused(elapsed) => format!("Fast paused at {}", elapsed),
            Message::FastResumed(elapsed, ends_at) => format!("Fast resumed at {}, target now at {}", elapsed, ends_at),
            Message::FastAlreadyPaused => "The fast is already paused".to_string(),
            Message::FastNotPaused => "The fast is not paused".to_string(),
            Message::FastEnded(duration, target) => format!("Fast ended after {} (target {})", duration, target),
            Message::FastEndedTargetReached => "Target reached, well done!".to_string(),
            Message::FastEndedEarly(progress) => format!("Ended at {:.0}% of the target", progress),
            Message::NoActiveFast => "No fast in progress".to_string(),
            Message::StartHint => "Run `fastline start` to begin a fast".to_string(),

            // === STATUS MESSAGES ===
            Message::StatusHeader(status) => format!("Fast {}", status),
            Message::StatusPlan(plan, duration) => format!("Plan:       {} ({})", plan, duration),
            Message::StatusStartedAt(time) => format!("Started:    {}", time),
            Message::StatusElapsed(elapsed) => format!("Elapsed:    {}", elapsed),
            Message::StatusRemaining(remaining) => format!("Remaining:  {}", remaining),
            Message::StatusProgress(progress) => format!("Progress:   {:.1}%", progress),
            Message::StatusEndsAt(time) => format!("Target at:  {}", time),
            Message::StatusPausedSince(time) => format!("Paused at:  {}", time),
            Message::IdleStatus(plan, duration) => format!("No fast in progress. Selected plan: {} ({})", plan, duration),

            // === WATCH MESSAGES ===
            Message::WatchStarted(interval) => format!("Watching the current fast every {} ms, press Ctrl+C to stop", interval),
            Message::WatchTick(icon, elapsed, progress, remaining) => {
                format!("{} {}  {:5.1}%  {} left", icon, elapsed, progress, remaining)
            }
            Message::MilestoneReached(hours) => format!("Milestone: {} hours fasted", hours),
            Message::TargetReached => "Fasting target reached!".to_string(),
            Message::WatchPaused => "Fast paused".to_string(),
            Message::WatchResumed => "Fast resumed".to_string(),
            Message::WatchFastEnded => "The fast has ended".to_string(),
            Message::WatchStopped => "Stopped watching".to_string(),

            // === PLAN MESSAGES ===
            Message::CurrentPlan(plan, duration) => format!("Selected plan: {} ({})", plan, duration),
            Message::PlanSelected(plan, duration) => format!("Plan {} selected ({})", plan, duration),
            Message::CustomDurationSet(duration) => format!("Custom fast length set to {}", duration),
            Message::PlanChangeDiscardsFast(elapsed) => {
                format!("Changing the plan discards the fast in progress ({} elapsed)", elapsed)
            }
            Message::ConfirmDiscardFast => "Discard the fast in progress?".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::PlansHeader => "Fasting plans".to_string(),

            // === HISTORY MESSAGES ===
            Message::HistoryEmpty => "No completed fasts yet".to_string(),
            Message::HistoryHeader(shown, total) => format!("Fasting history ({} of {})", shown, total),
            Message::StatsHeader => "Fasting statistics".to_string(),

            // === PREFERENCES MESSAGES ===
            Message::PreferencesUpdated => "Preferences updated".to_string(),
            Message::PreferencesHeader => "Preferences".to_string(),

            // === WEIGHT MESSAGES ===
            Message::WeightAdded(weight) => format!("Weight {} recorded", weight),
            Message::WeightDeleted(id) => format!("Weight entry {} deleted", id),
            Message::WeightsEmpty => "No weight entries yet".to_string(),
            Message::WeightGoalSet(target) => format!("Weight goal set to {}", target),
            Message::WeightGoalCleared => "Weight goal cleared".to_string(),
            Message::NoWeightGoal => "No weight goal set".to_string(),
            Message::WeightUnitSet(unit) => format!("Weights are now shown in {}", unit),
            Message::WeightImported(imported, skipped) => {
                format!("Imported {} weight entries, skipped {} already present or invalid", imported, skipped)
            }
            Message::WeightImportRowInvalid(line, error) => format!("Line {}: {}", line, error),
            Message::WeightStatsHeader => "Weight summary".to_string(),
            Message::GoalReached => "Goal reached".to_string(),
            Message::InvalidDate(date) => format!("Invalid date '{}', expected YYYY-MM-DD or 'today'", date),

            // === SYNC MESSAGES ===
            Message::SyncNotConfigured => "Remote sync is not configured, run `fastline init` and select Remote sync".to_string(),
            Message::SyncUnauthorized => "The backend rejected the auth token".to_string(),
            Message::SyncRequestFailed(status) => format!("Backend request failed with status {}", status),
            Message::SyncDelivered(count) => format!("Synced {} fast(s)", count),
            Message::SyncFailed(record, error) => format!("Sync stopped at fast {}: {}", record, error),
            Message::SyncDropped(count) => format!("Dropped {} unreadable queued item(s)", count),
            Message::SyncPending(count) => format!("{} fast(s) waiting to be synced", count),
            Message::SyncQueueEmpty => "Nothing to sync".to_string(),

            // === EXPORT MESSAGES ===
            Message::ExportingData(data, format) => format!("Exporting {} as {}", data, format),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file to delete".to_string(),
            Message::ConfigModuleSync => "Remote sync settings".to_string(),
            Message::ConfigModuleTimer => "Timer settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptSyncApiUrl => "Enter the backend API URL".to_string(),
            Message::PromptSyncAuthToken => "Enter the backend auth token".to_string(),
            Message::PromptSyncTimeout => "Request timeout (seconds)".to_string(),
            Message::PromptSyncBatchSize => "Fasts uploaded per sync".to_string(),
            Message::PromptTimerTickInterval => "Timer refresh interval (ms)".to_string(),
            Message::PromptTimerCheckpointEvery => "Save elapsed time every N ticks".to_string(),
            Message::PromptTimerMilestones => "Milestone hours (comma separated)".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::DatabaseMigrated(version) => format!("Database schema updated to v{}", version),
        };
        write!(f, "{}", text)
    }
}
