//! User model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Eco-points credited for registering a new plant.
pub const REGISTRATION_POINTS: i64 = 100;

/// A participant who registers, adopts, and cares for plants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    /// Unique identifier for the user
    pub id: String,

    /// Last reported device location; unset until the user shares one
    pub location: Option<GeoPoint>,

    /// Denormalized list of plants this user registered
    #[serde(default)]
    pub added_plants: Vec<String>,

    /// Denormalized list of plants this user adopted
    #[serde(default)]
    pub adopted_plants: Vec<String>,

    /// Denormalized set of pending quests assigned to this user
    #[serde(default)]
    pub active_quests: Vec<String>,

    /// Denormalized set of quests this user completed
    #[serde(default)]
    pub quests_completed: Vec<String>,

    /// Accumulated reward points; never negative
    #[serde(default)]
    pub eco_points: i64,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# User {}", self.id)?;
        writeln!(f)?;
        match &self.location {
            Some(loc) => writeln!(f, "- Location: {:.6}, {:.6}", loc.lat, loc.lng)?,
            None => writeln!(f, "- Location: (not set)")?,
        }
        writeln!(f, "- Eco-points: {}", self.eco_points)?;
        writeln!(f, "- Plants added: {}", self.added_plants.len())?;
        writeln!(f, "- Plants adopted: {}", self.adopted_plants.len())?;
        writeln!(f, "- Active quests: {}", self.active_quests.len())?;
        writeln!(f, "- Completed quests: {}", self.quests_completed.len())?;
        Ok(())
    }
}
