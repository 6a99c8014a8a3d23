//! Grove CLI Application
//!
//! Command-line interface for the Grove plant-care quest tracker.

mod args;
mod cli;
mod kindwise;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, PlantCommands};
use grove_core::GroveBuilder;
use kindwise::KindwiseClient;
use log::info;
use renderer::TerminalRenderer;

/// Environment variable holding the Kindwise API key. When unset, photo-only
/// registration is unavailable and `plant register` requires `--species`.
const API_KEY_ENV: &str = "KINDWISE_API_KEY";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let mut builder = GroveBuilder::new().with_database_path(database_file);
    if let Ok(api_key) = std::env::var(API_KEY_ENV) {
        builder = builder.with_identifier(Arc::new(KindwiseClient::new(api_key)));
    }
    let grove = builder.build().await.context("Failed to initialize engine")?;

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(grove, renderer);

    info!("Grove started");

    match command {
        Some(Commands::Plant { command }) => cli.handle_plant_command(command).await,
        Some(Commands::Quest { command }) => cli.handle_quest_command(command).await,
        Some(Commands::User { command }) => cli.handle_user_command(command).await,
        None => cli.handle_plant_command(PlantCommands::List).await,
    }
}
