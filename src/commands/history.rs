use crate::{
    libs::{app::AppState, formatter::format_fasts, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(short, long, default_value_t = 20, help = "Number of fasts to show")]
    limit: usize,

    #[arg(short, long, help = "Show statistics instead of the list")]
    stats: bool,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let app = AppState::open()?;
    let history = app.fasting.history();

    if history.is_empty() {
        msg_info!(Message::HistoryEmpty);
        return Ok(());
    }

    if args.stats {
        msg_print!(Message::StatsHeader, true);
        View::stats(&app.fasting.stats());
        return Ok(());
    }

    let shown = &history[..args.limit.min(history.len())];
    msg_print!(Message::HistoryHeader(shown.len(), history.len()), true);
    View::fasts(&format_fasts(shown));
    Ok(())
}
