use crate::{
    libs::{
        app::AppState,
        fast::FastStatus,
        formatter::{format_clock_time, format_elapsed},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;

pub fn pause() -> Result<()> {
    let mut app = AppState::open()?;

    match app.fasting.status() {
        FastStatus::Idle => msg_info!(Message::NoActiveFast),
        FastStatus::Paused => msg_info!(Message::FastAlreadyPaused),
        FastStatus::Running => {
            app.fasting.pause_fast();
            msg_success!(Message::FastPaused(format_elapsed(app.fasting.elapsed())));
        }
    }
    Ok(())
}

pub fn resume() -> Result<()> {
    let mut app = AppState::open()?;

    match app.fasting.status() {
        FastStatus::Idle => msg_info!(Message::NoActiveFast),
        FastStatus::Running => msg_info!(Message::FastNotPaused),
        FastStatus::Paused => {
            app.fasting.pause_fast();
            let now = app.fasting.now();
            let ends_at = app
                .fasting
                .current()
                .map(|fast| format_clock_time(fast.target_time_at(now).timestamp_millis()))
                .unwrap_or_default();
            msg_success!(Message::FastResumed(format_elapsed(app.fasting.elapsed()), ends_at));
        }
    }
    Ok(())
}
