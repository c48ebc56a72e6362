use crate::{
    libs::{
        app::AppState,
        fast::FastStatus,
        formatter::format_elapsed,
        messages::{macros::is_debug_mode, Message},
        timer::{FastTimer, TimerEvent},
    },
    msg_debug, msg_info, msg_success,
};
use anyhow::Result;
use std::io::{self, Write};

pub async fn cmd() -> Result<()> {
    let mut app = AppState::open()?;
    if app.fasting.current().is_none() {
        msg_info!(Message::NoActiveFast);
        return Ok(());
    }

    let timer_config = app.config.timer_config();
    let notifications = app.fasting.preferences().notifications_enabled;
    msg_info!(Message::WatchStarted(timer_config.tick_interval_ms));

    let mut timer = FastTimer::new(timer_config);
    timer.run(&mut app.fasting, |event| render(event, notifications)).await?;

    clear_line();
    msg_info!(Message::WatchStopped);
    Ok(())
}

fn render(event: &TimerEvent, notifications: bool) {
    match event {
        TimerEvent::Tick(snapshot) => {
            let icon = if snapshot.status == FastStatus::Paused { "⏸" } else { "⏳" };
            let line = Message::WatchTick(
                icon.to_string(),
                format_elapsed(snapshot.elapsed),
                snapshot.progress,
                format_elapsed(snapshot.remaining),
            );
            if is_debug_mode() {
                msg_debug!(line);
            } else {
                print!("\r{}", line);
                let _ = io::stdout().flush();
            }
        }
        TimerEvent::Milestone(hours) if notifications => {
            clear_line();
            msg_success!(Message::MilestoneReached(*hours));
        }
        TimerEvent::TargetReached if notifications => {
            clear_line();
            msg_success!(Message::TargetReached);
        }
        TimerEvent::Paused => {
            clear_line();
            msg_info!(Message::WatchPaused);
        }
        TimerEvent::Resumed => {
            clear_line();
            msg_info!(Message::WatchResumed);
        }
        TimerEvent::Ended => {
            clear_line();
            msg_info!(Message::WatchFastEnded);
        }
        _ => {}
    }
}

fn clear_line() {
    if !is_debug_mode() {
        print!("\r\x1b[2K");
        let _ = io::stdout().flush();
    }
}
