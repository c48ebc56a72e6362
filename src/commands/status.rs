use crate::{
    libs::{
        app::AppState,
        fast::{ActiveState, FastStatus},
        formatter::{format_clock_time, format_duration, format_elapsed},
        messages::Message,
    },
    msg_info, msg_print,
};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let app = AppState::open()?;
    let fasting = &app.fasting;
    let now = fasting.now();

    let Some(fast) = fasting.current() else {
        let prefs = fasting.preferences();
        msg_info!(Message::IdleStatus(prefs.selected_plan.clone(), format_duration(&prefs.planned_duration())));
        msg_print!(Message::StartHint);
        return Ok(());
    };

    let status = match fasting.status() {
        FastStatus::Paused => "paused",
        _ => "running",
    };
    msg_print!(Message::StatusHeader(status.to_string()), true);
    msg_print!(Message::StatusPlan(fast.plan.clone().unwrap_or_default(), format_duration(&fast.planned_duration)));
    msg_print!(Message::StatusStartedAt(format_clock_time(fast.start_time.timestamp_millis())));
    msg_print!(Message::StatusElapsed(format_elapsed(fast.elapsed_at(now))));
    msg_print!(Message::StatusRemaining(format_elapsed(fast.remaining_at(now))));
    msg_print!(Message::StatusProgress(fast.progress_at(now)));
    match fast.state {
        ActiveState::Paused { paused_at } => {
            msg_print!(Message::StatusPausedSince(format_clock_time(paused_at.timestamp_millis())));
        }
        ActiveState::Running => {
            msg_print!(Message::StatusEndsAt(format_clock_time(fast.target_time_at(now).timestamp_millis())));
        }
    }
    Ok(())
}
