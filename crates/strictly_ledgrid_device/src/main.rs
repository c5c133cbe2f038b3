//! Strictly Ledgrid - host build
//!
//! Runs the device core against a terminal lamp grid. Type a digit `1`-`9`
//! and Enter to press a cell's button; logs go to stderr.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use strictly_ledgrid_device::{
    Contacts, TerminalIndicators, TimingConfig, VirtualMatrix, power_on, spawn_keyboard,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => TimingConfig::from_file(path)?,
        None => TimingConfig::default(),
    };

    let contacts = Contacts::new();
    let _keyboard = spawn_keyboard(contacts.clone(), cli.key_hold());

    let halted = power_on(
        TerminalIndicators::new(std::io::stdout()),
        VirtualMatrix::new(contacts),
        cli.mode(),
        cli.automated_player.into(),
        &config,
    )
    .await?;

    info!(outcome = %halted.outcome(), "Game over, Ctrl-C to power off");
    tokio::signal::ctrl_c().await?;
    halted.power_off();

    Ok(())
}
