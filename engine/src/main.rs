// TuneScout
// Main entry point for the tunescout binary

use clap::Parser;
use tunescout_engine::cli::{Cli, Command};
use tunescout_engine::config::Config;
use tunescout_engine::handlers::{handle_demo, handle_suggest};
use tunescout_engine::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // CLI flag wins over the configured level; RUST_LOG wins over both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry(log_level);

    tracing::info!("TuneScout v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Demo => handle_demo(),
        Command::Suggest { count, seed, basis } => {
            handle_suggest(&config, count, &seed, &basis).await
        }
    }
}
