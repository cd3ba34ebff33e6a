//! spa-client entry point.

mod app;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::CliCommand;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = CliCommand::parse();
    if let Err(e) = run(command) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: CliCommand) -> anyhow::Result<()> {
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting spa-client");

    let config = config::Config::load(command.config_dir.as_deref())?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(command, config))
}
