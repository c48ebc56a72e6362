pub mod end;
pub mod export;
pub mod history;
pub mod init;
pub mod pause;
pub mod plan;
pub mod plans;
pub mod prefs;
pub mod start;
pub mod status;
pub mod sync;
pub mod watch;
pub mod weight;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Start a fast")]
    Start(start::StartArgs),
    #[command(about = "Pause the fast in progress")]
    Pause,
    #[command(about = "Resume a paused fast")]
    Resume,
    #[command(about = "End the fast in progress and record it")]
    End,
    #[command(about = "Show the fast in progress")]
    Status,
    #[command(about = "Follow the fast in progress with a live timer")]
    Watch,
    #[command(about = "Show or select the fasting plan")]
    Plan(plan::PlanArgs),
    #[command(about = "List the available fasting plans")]
    Plans,
    #[command(about = "Show completed fasts")]
    History(history::HistoryArgs),
    #[command(about = "Show or change preferences")]
    Prefs(prefs::PrefsArgs),
    #[command(about = "Track weight and a weight goal")]
    Weight(weight::WeightArgs),
    #[command(about = "Upload completed fasts to the backend")]
    Sync(sync::SyncArgs),
    #[command(about = "Export fasts and weights to CSV or JSON")]
    Export(export::ExportArgs),
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Start(args) => start::cmd(args),
            Commands::Pause => pause::pause(),
            Commands::Resume => pause::resume(),
            Commands::End => end::cmd().await,
            Commands::Status => status::cmd(),
            Commands::Watch => watch::cmd().await,
            Commands::Plan(args) => plan::cmd(args),
            Commands::Plans => plans::cmd(),
            Commands::History(args) => history::cmd(args),
            Commands::Prefs(args) => prefs::cmd(args),
            Commands::Weight(args) => weight::cmd(args),
            Commands::Sync(args) => sync::cmd(args).await,
            Commands::Export(args) => export::cmd(args),
            Commands::Init(args) => init::cmd(args),
        }
    }
}
