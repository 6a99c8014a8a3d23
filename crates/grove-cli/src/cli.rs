//! Command-line interface definitions using clap
//!
//! Implements the parameter wrapper pattern: each subcommand defines a clap
//! argument struct here and converts it into the framework-free parameter
//! structs of `grove_core::params`, so CLI concerns (flags, help text) never
//! leak into the core.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use grove_core::{
    params::{AdoptPlant, CompleteQuest, Id, ListUserQuests, RegisterPlant, UpdateLocation},
    Grove, OperationStatus, PlantAnalysis, PlantList, QuestList, QuestStatus,
};

use crate::renderer::TerminalRenderer;

/// Plant management commands
#[derive(Subcommand)]
pub enum PlantCommands {
    /// Register a new plant from a photo
    Register(RegisterArgs),
    /// Adopt a plant
    Adopt(AdoptArgs),
    /// Show a plant's details
    Show {
        /// Plant ID
        id: String,
    },
    /// List all tracked plants
    List,
}

/// Quest management commands
#[derive(Subcommand)]
pub enum QuestCommands {
    /// Run one scheduler pass, creating every quest that has come due
    Schedule,
    /// List pending quests on plants near the user's stored location
    Nearby {
        /// User ID
        #[arg(long)]
        user: String,
    },
    /// Complete a quest and collect the reward
    Complete(CompleteArgs),
    /// List a user's quests by status
    List(UserQuestsArgs),
}

/// User management commands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user record
    Create {
        /// User ID
        id: String,
    },
    /// Show a user's record
    Show {
        /// User ID
        id: String,
    },
    /// Update a user's stored location
    Locate(LocateArgs),
}

/// Register a new plant
///
/// With `--species`, the plant is entered manually and the identification
/// service is skipped; otherwise the photo is sent to the configured
/// identification service (KINDWISE_API_KEY).
#[derive(Args)]
pub struct RegisterArgs {
    /// Registering user ID
    #[arg(long)]
    pub user: String,
    /// Latitude of the plant, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    /// Longitude of the plant, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
    /// Path to the plant photo (PNG/JPEG)
    #[arg(long)]
    pub photo: PathBuf,
    /// Scientific species name, skipping the identification service
    #[arg(long)]
    pub species: Option<String>,
    /// Common name to record alongside a manually entered species
    #[arg(long, requires = "species")]
    pub common_name: Option<String>,
}

impl RegisterArgs {
    /// Reads the photo and converts into core registration parameters.
    pub fn into_params(self) -> Result<RegisterPlant> {
        let photo = std::fs::read(&self.photo)
            .with_context(|| format!("Failed to read photo {}", self.photo.display()))?;
        let analysis = self
            .species
            .map(|species| PlantAnalysis::manual(species, self.common_name));
        Ok(RegisterPlant {
            user_id: self.user,
            lat: self.lat,
            lng: self.lng,
            photo,
            analysis,
        })
    }
}

/// Adopt a plant for a user
#[derive(Args)]
pub struct AdoptArgs {
    /// Plant ID to adopt
    pub plant_id: String,
    /// Adopting user ID
    #[arg(long)]
    pub user: String,
}

impl From<AdoptArgs> for AdoptPlant {
    fn from(val: AdoptArgs) -> Self {
        AdoptPlant {
            user_id: val.user,
            plant_id: val.plant_id,
        }
    }
}

/// Complete a quest
#[derive(Args)]
pub struct CompleteArgs {
    /// Quest ID to complete
    pub quest_id: String,
    /// Completing user ID
    #[arg(long)]
    pub user: String,
}

impl From<CompleteArgs> for CompleteQuest {
    fn from(val: CompleteArgs) -> Self {
        CompleteQuest {
            quest_id: val.quest_id,
            user_id: val.user,
        }
    }
}

/// List a user's quests
#[derive(Args)]
pub struct UserQuestsArgs {
    /// Assignee user ID
    #[arg(long)]
    pub user: String,
    /// Status to filter by
    #[arg(long, value_enum, default_value = "pending")]
    pub status: StatusFilter,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl From<UserQuestsArgs> for ListUserQuests {
    fn from(val: UserQuestsArgs) -> Self {
        ListUserQuests {
            user_id: val.user,
            status: match val.status {
                StatusFilter::Pending => QuestStatus::Pending,
                StatusFilter::Completed => QuestStatus::Completed,
            },
        }
    }
}

/// Update a user's location
#[derive(Args)]
pub struct LocateArgs {
    /// User ID
    #[arg(long)]
    pub user: String,
    /// Latitude, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    /// Longitude, degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
}

impl From<LocateArgs> for UpdateLocation {
    fn from(val: LocateArgs) -> Self {
        UpdateLocation {
            user_id: val.user,
            lat: val.lat,
            lng: val.lng,
        }
    }
}

/// Command dispatcher pairing the engine with the terminal renderer.
pub struct Cli {
    grove: Grove,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(grove: Grove, renderer: TerminalRenderer) -> Self {
        Self { grove, renderer }
    }

    pub async fn handle_plant_command(&self, command: PlantCommands) -> Result<()> {
        match command {
            PlantCommands::Register(args) => {
                let params = args.into_params()?;
                let receipt = self.grove.register_plant(&params).await?;
                self.renderer.render(&receipt.to_string());
            }
            PlantCommands::Adopt(args) => {
                let params: AdoptPlant = args.into();
                self.grove.adopt_plant(&params).await?;
                let status = OperationStatus::success(format!(
                    "Plant {} adopted by {}.",
                    params.plant_id, params.user_id
                ));
                self.renderer.render(&status.to_string());
            }
            PlantCommands::Show { id } => match self.grove.get_plant(&Id::new(&id)).await? {
                Some(plant) => self.renderer.render(&plant.to_string()),
                None => {
                    let status = OperationStatus::failure(format!("Plant {id} not found."));
                    self.renderer.render(&status.to_string());
                }
            },
            PlantCommands::List => {
                let plants = self.grove.list_plants().await?;
                self.renderer.render(&PlantList(plants).to_string());
            }
        }
        Ok(())
    }

    pub async fn handle_quest_command(&self, command: QuestCommands) -> Result<()> {
        match command {
            QuestCommands::Schedule => {
                let outcome = self.grove.run_scheduler_once(jiff::Timestamp::now()).await?;
                self.renderer.render(&outcome.to_string());
            }
            QuestCommands::Nearby { user } => {
                let quests = self.grove.nearby_quests(&Id::new(user)).await?;
                self.renderer.render(&QuestList(quests).to_string());
            }
            QuestCommands::Complete(args) => {
                let receipt = self.grove.complete_quest(&args.into()).await?;
                self.renderer.render(&receipt.to_string());
            }
            QuestCommands::List(args) => {
                let quests = self.grove.user_quests(&args.into()).await?;
                self.renderer.render(&QuestList(quests).to_string());
            }
        }
        Ok(())
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        match command {
            UserCommands::Create { id } => {
                let user = self.grove.create_user(&Id::new(id)).await?;
                self.renderer.render(&user.to_string());
            }
            UserCommands::Show { id } => match self.grove.get_user(&Id::new(&id)).await? {
                Some(user) => self.renderer.render(&user.to_string()),
                None => {
                    let status = OperationStatus::failure(format!("User {id} not found."));
                    self.renderer.render(&status.to_string());
                }
            },
            UserCommands::Locate(args) => {
                let params: UpdateLocation = args.into();
                self.grove.update_user_location(&params).await?;
                let status = OperationStatus::success(format!(
                    "Location for {} set to {:.6}, {:.6}.",
                    params.user_id, params.lat, params.lng
                ));
                self.renderer.render(&status.to_string());
            }
        }
        Ok(())
    }
}
