use anyhow::Result;
use fastline::commands::Cli;
use fastline::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fastline=debug")))
            .with_target(false)
            .init();
    }

    Cli::menu().await
}
