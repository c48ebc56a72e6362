use crate::{
    libs::{app::AppState, formatter::format_duration, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let mut app = AppState::open()?;

    let Some(outcome) = app.end_fast().await? else {
        msg_info!(Message::NoActiveFast);
        return Ok(());
    };

    let fast = &outcome.fast;
    msg_success!(Message::FastEnded(format_duration(&fast.duration()), format_duration(&fast.planned_duration)));
    if fast.reached_target() {
        msg_info!(Message::FastEndedTargetReached);
    } else {
        msg_info!(Message::FastEndedEarly(fast.progress()));
    }

    if let Some(report) = &outcome.sync {
        if report.delivered > 0 || report.failed.is_some() {
            super::sync::print_report(report);
        }
    }
    Ok(())
}
