use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{PlantCommands, QuestCommands, UserCommands};

/// Main command-line interface for the Grove plant-care quest tracker
///
/// Grove tracks registered plants and issues recurring care quests (watering,
/// health checks, growth reports, photo submissions), rewarding users with
/// eco-points on completion. Plant registration runs the duplicate guard:
/// a plant of the same species a few meters away with a near-identical photo
/// is rejected as already tracked.
#[derive(Parser)]
#[command(version, about, name = "grove")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/grove/grove.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Grove CLI
///
/// The CLI is organized into three command categories:
/// - `plant`: register, adopt, and inspect plants
/// - `quest`: run the scheduler, discover and complete quests
/// - `user`: manage user records and locations
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plants
    #[command(alias = "p")]
    Plant {
        #[command(subcommand)]
        command: PlantCommands,
    },
    /// Manage quests
    #[command(alias = "q")]
    Quest {
        #[command(subcommand)]
        command: QuestCommands,
    },
    /// Manage users
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}
