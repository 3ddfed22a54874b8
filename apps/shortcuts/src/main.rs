//! Non-Steam shortcut tool for the ZLADXHD installer.

mod app;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = app::Cli::parse();

    let config = config::Config::load()?;
    tracing::debug!(steam_dir = %config.steam_dir, "configuration loaded");

    app::run(&config, cli)
}
