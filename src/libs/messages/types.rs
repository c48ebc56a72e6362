#[derive(Debug, Clone)]
pub enum Message {
    // === FASTING MESSAGES ===
    FastStarted(String, String, String), // plan, planned duration, ends at
    FastReplaced(String),                // elapsed time of the discarded fast
    FastPaused(String),                  // elapsed
    FastResumed(String, String),         // elapsed, new end time
    FastAlreadyPaused,
    FastNotPaused,
    FastEnded(String, String),           // duration, planned duration
    FastEndedTargetReached,
    FastEndedEarly(f64),                 // progress percent
    NoActiveFast,
    StartHint,

    // === STATUS MESSAGES ===
    StatusHeader(String),         // status
    StatusPlan(String, String),   // plan, planned duration
    StatusStartedAt(String),      // clock time
    StatusElapsed(String),        // HH:MM:SS
    StatusRemaining(String),      // HH:MM:SS
    StatusProgress(f64),          // percent
    StatusEndsAt(String),         // clock time
    StatusPausedSince(String),    // clock time
    IdleStatus(String, String),   // selected plan, planned duration

    // === WATCH MESSAGES ===
    WatchStarted(u64),   // tick interval in ms
    WatchTick(String, String, f64, String), // status icon, elapsed, progress, remaining
    MilestoneReached(u32), // hours
    TargetReached,
    WatchPaused,
    WatchResumed,
    WatchFastEnded,
    WatchStopped,

    // === PLAN MESSAGES ===
    CurrentPlan(String, String), // plan, planned duration
    PlanSelected(String, String), // plan, planned duration
    CustomDurationSet(String),    // planned duration
    PlanChangeDiscardsFast(String), // elapsed
    ConfirmDiscardFast,
    OperationCancelled,
    PlansHeader,

    // === HISTORY MESSAGES ===
    HistoryEmpty,
    HistoryHeader(usize, usize), // shown, total
    StatsHeader,

    // === PREFERENCES MESSAGES ===
    PreferencesUpdated,
    PreferencesHeader,

    // === WEIGHT MESSAGES ===
    WeightAdded(String),  // formatted weight
    WeightDeleted(String), // id
    WeightsEmpty,
    WeightGoalSet(String), // formatted target
    WeightGoalCleared,
    NoWeightGoal,
    WeightUnitSet(String),
    WeightImported(usize, usize), // imported, skipped
    WeightImportRowInvalid(usize, String), // line, error
    WeightStatsHeader,
    GoalReached,
    InvalidDate(String),

    // === SYNC MESSAGES ===
    SyncNotConfigured,
    SyncUnauthorized,
    SyncRequestFailed(u16),       // HTTP status
    SyncDelivered(usize),         // count
    SyncFailed(String, String),   // record id, error
    SyncDropped(usize),           // count
    SyncPending(usize),           // count
    SyncQueueEmpty,

    // === EXPORT MESSAGES ===
    ExportingData(String, String), // data, format
    ExportCompleted(String),       // path

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleSync,
    ConfigModuleTimer,
    PromptSelectModules,
    PromptSyncApiUrl,
    PromptSyncAuthToken,
    PromptSyncTimeout,
    PromptSyncBatchSize,
    PromptTimerTickInterval,
    PromptTimerCheckpointEvery,
    PromptTimerMilestones,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationFailed(u32, String),  // version, error
    DatabaseMigrated(u32),         // version
}
