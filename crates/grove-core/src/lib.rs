//! Core library for the Grove plant-care quest engine.
//!
//! Grove tracks user-registered plants and issues recurring care quests —
//! watering, health checks, growth reports, photo submissions — rewarding
//! users with eco-points on completion. This crate provides the engine
//! behind every interface: domain models, the SQLite store client, geo
//! proximity tests, perceptual photo fingerprints, the duplicate-registration
//! guard, the quest scheduler, and the [`Grove`] service facade.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grove_core::{params::Id, GroveBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let grove = GroveBuilder::new()
//!     .with_database_path(Some("grove.db"))
//!     .build()
//!     .await?;
//!
//! grove.create_user(&Id::new("user_1")).await?;
//!
//! // One scheduler pass: create every quest that has come due.
//! let outcome = grove.run_scheduler_once(jiff::Timestamp::now()).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod geo;
pub mod guard;
pub mod identify;
pub mod models;
pub mod params;
pub mod schedule;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CompletionReceipt, OperationStatus, PlantList, QuestList, RegistrationReceipt, ScheduleOutcome,
};
pub use engine::{Grove, GroveBuilder};
pub use error::{GroveError, Result};
pub use fingerprint::Fingerprint;
pub use geo::GeoPoint;
pub use guard::DuplicateGuard;
pub use identify::{PlantAnalysis, PlantIdentifier, SpeciesSuggestion};
pub use models::{
    Disease, HealthStatus, PhotoRecord, Plant, ProofSubmission, Quest, QuestStatus, QuestType,
    User, DEFAULT_REWARD_POINTS, REGISTRATION_POINTS,
};
