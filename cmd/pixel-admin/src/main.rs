//! # pixel-admin
//!
//! Admin CLI for the Pixel site. Assembles the content store from the
//! configured backend and runs one command against it.

mod cli;
mod commands;
mod telemetry;
mod wiring;

use clap::Parser;
use cli::Cli;
use configs::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Settings and logging
    let settings = Settings::load(cli.config.as_deref())?;
    telemetry::init(&settings.log);

    // 2. Adapters for the configured mode
    let backend = wiring::build_backend(&settings).await?;

    // 3. Store, then the command
    let mut store = wiring::content_store(&settings, backend);
    commands::run(cli.command, &settings, &mut store).await
}
