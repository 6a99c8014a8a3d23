//! High-level quest engine API.
//!
//! [`Grove`] is the central coordinator between the interface layers and the
//! store, implementing the quest lifecycle: registration behind the duplicate
//! guard, adoption, the recurring-quest scheduler, nearby quest discovery,
//! and quest completion.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Interfaces    │    │      Grove      │    │    Database     │
//! │     (CLI)       │───▶│ (plant_ops,     │───▶│   (via db/)     │
//! │                 │    │  quest_ops)     │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Every operation opens its own store handle inside `spawn_blocking` and
//! runs to completion; there is no shared in-process state. Operations on
//! different plants, quests, or users are safe to run concurrently. Two
//! windows are deliberately tolerated rather than locked away:
//!
//! - Overlapping scheduler runs can both see "no quest due" for the same
//!   (plant, type) pair and each create one. Duplicate quests are undesirable
//!   but harmless; closing the window would take a unique
//!   (plant, type, time-bucket) constraint.
//! - Quest completion touches three aggregates without one transaction. The
//!   conditional status flip on the quest is the durability anchor: the
//!   remaining effects are membership-checked set updates and a flip-guarded
//!   increment, so a retry or reconciliation pass can re-apply them safely.
//!
//! Cache updates that fail after an authoritative write are logged via
//! `log::warn!` with the affected IDs and never propagated — the quest
//! records remain the source of truth and the denormalized lists can be
//! rebuilt from them.

use std::path::PathBuf;
use std::sync::Arc;

use crate::guard::DuplicateGuard;
use crate::identify::PlantIdentifier;

pub mod builder;
pub mod plant_ops;
pub mod quest_ops;


pub use builder::GroveBuilder;

/// Main engine interface for managing plants, quests, and users.
pub struct Grove {
    pub(crate) db_path: PathBuf,
    pub(crate) identifier: Option<Arc<dyn PlantIdentifier>>,
    pub(crate) guard: DuplicateGuard,
}

impl Grove {
    /// Creates a new engine over the given database path.
    pub(crate) fn new(
        db_path: PathBuf,
        identifier: Option<Arc<dyn PlantIdentifier>>,
        guard: DuplicateGuard,
    ) -> Self {
        Self {
            db_path,
            identifier,
            guard,
        }
    }
}
