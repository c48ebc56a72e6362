use crate::{
    libs::{app::AppState, messages::Message, sync::SyncReport, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[arg(short, long, help = "List queued fasts instead of uploading them")]
    status: bool,
}

pub async fn cmd(args: SyncArgs) -> Result<()> {
    let app = AppState::open()?;

    if args.status {
        let outbox = app.outbox()?;
        let items = outbox.pending(outbox.count()?)?;
        if items.is_empty() {
            msg_info!(Message::SyncQueueEmpty);
            return Ok(());
        }
        msg_print!(Message::SyncPending(items.len()), true);
        View::outbox(&items);
        return Ok(());
    }

    let report = app.sync().await?;
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &SyncReport) {
    if report.delivered == 0 && report.failed.is_none() && report.dropped == 0 && report.remaining == 0 {
        msg_info!(Message::SyncQueueEmpty);
        return;
    }
    if report.delivered > 0 {
        msg_success!(Message::SyncDelivered(report.delivered));
    }
    if report.dropped > 0 {
        msg_warning!(Message::SyncDropped(report.dropped));
    }
    if let Some((record, error)) = &report.failed {
        msg_warning!(Message::SyncFailed(record.clone(), error.clone()));
    }
    if report.remaining > 0 {
        msg_info!(Message::SyncPending(report.remaining));
    }
}
