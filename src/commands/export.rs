use crate::{
    libs::{
        app::AppState,
        export::{ExportData, ExportFormat, Exporter},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Data to export: fasts, weights or all
    #[arg(short, long, value_enum, default_value = "fasts")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file; defaults to fastline_export_<timestamp>.<ext> in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let app = AppState::open()?;

    msg_info!(Message::ExportingData(format!("{:?}", args.data).to_lowercase(), args.format.extension().to_string()));

    let exporter = Exporter::new(args.format, args.output);
    let written = exporter.export(args.data, app.fasting.history(), app.weight.entries())?;
    for path in written {
        msg_success!(Message::ExportCompleted(path.display().to_string()));
    }
    Ok(())
}
