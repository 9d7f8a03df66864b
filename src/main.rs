#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use anyhow::{Context, Result};
use brandlens::Config;
use brandlens::cli::{Cli, Commands, dispatch, init_config};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        return init_config(cli.config, force);
    }

    let config = Config::load_or_default(cli.config.as_deref())?;

    // Logs go to stderr so stdout stays pure JSON.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.logging.max_level().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    dispatch(cli, config).await
}
