//! Parameter structures for Grove operations.
//!
//! Shared parameter structures used across interfaces (CLI today, HTTP
//! tomorrow) without framework-specific derives. Interface layers wrap these
//! with their own derives (clap args, request extractors) and convert with
//! `From`/`Into`; validation that belongs to the domain — coordinate ranges,
//! required IDs — lives here so every interface gets it for free.

use serde::{Deserialize, Serialize};

use crate::error::{GroveError, Result};
use crate::geo::GeoPoint;
use crate::models::QuestStatus;

fn require_id(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GroveError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

fn require_coordinates(lat: f64, lng: f64) -> Result<GeoPoint> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(GroveError::invalid_input(
            "lat",
            format!("latitude {lat} is outside [-90, 90]"),
        ));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(GroveError::invalid_input(
            "lng",
            format!("longitude {lng} is outside [-180, 180]"),
        ));
    }
    Ok(GeoPoint::new(lat, lng))
}

/// Generic parameters for operations requiring just an entity ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn validate(&self) -> Result<()> {
        require_id("id", &self.id)
    }
}

/// Parameters for registering a new plant.
///
/// The photo is the raw encoded image; the engine runs identification and
/// fingerprinting on it. When `analysis` is pre-supplied (manual entry or an
/// upstream caller that already identified the photo), the identification
/// service is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPlant {
    /// User registering the plant (required)
    pub user_id: String,
    /// Latitude of the plant, degrees
    pub lat: f64,
    /// Longitude of the plant, degrees
    pub lng: f64,
    /// Encoded photo bytes (PNG/JPEG)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub photo: Vec<u8>,
    /// Pre-supplied analysis, bypassing the identification service
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analysis: Option<crate::identify::PlantAnalysis>,
}

impl RegisterPlant {
    /// Validates required fields and returns the parsed location.
    pub fn validate(&self) -> Result<GeoPoint> {
        require_id("user_id", &self.user_id)?;
        if self.photo.is_empty() {
            return Err(GroveError::invalid_input("photo", "image data is missing"));
        }
        require_coordinates(self.lat, self.lng)
    }
}

/// Parameters for adopting a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdoptPlant {
    /// Adopting user (required)
    pub user_id: String,
    /// Plant to adopt (required)
    pub plant_id: String,
}

impl AdoptPlant {
    pub fn validate(&self) -> Result<()> {
        require_id("user_id", &self.user_id)?;
        require_id("plant_id", &self.plant_id)
    }
}

/// Parameters for updating a user's stored location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLocation {
    /// User whose location to update (required)
    pub user_id: String,
    /// New latitude, degrees
    pub lat: f64,
    /// New longitude, degrees
    pub lng: f64,
}

impl UpdateLocation {
    /// Validates required fields and returns the parsed location.
    pub fn validate(&self) -> Result<GeoPoint> {
        require_id("user_id", &self.user_id)?;
        require_coordinates(self.lat, self.lng)
    }
}

/// Parameters for completing a quest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteQuest {
    /// Quest to complete (required)
    pub quest_id: String,
    /// User submitting the completion (required)
    pub user_id: String,
}

impl CompleteQuest {
    pub fn validate(&self) -> Result<()> {
        require_id("quest_id", &self.quest_id)?;
        require_id("user_id", &self.user_id)
    }
}

/// Parameters for listing a user's quests by status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUserQuests {
    /// Assignee to list quests for (required)
    pub user_id: String,
    /// Status filter; defaults to pending
    #[serde(default)]
    pub status: QuestStatus,
}

impl ListUserQuests {
    pub fn validate(&self) -> Result<()> {
        require_id("user_id", &self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_plant_rejects_missing_photo() {
        let params = RegisterPlant {
            user_id: "user_1".to_string(),
            lat: 0.0,
            lng: 0.0,
            photo: Vec::new(),
            analysis: None,
        };
        let err = params.validate().unwrap_err();
        match err {
            GroveError::InvalidInput { field, .. } => assert_eq!(field, "photo"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn register_plant_rejects_out_of_range_coordinates() {
        let params = RegisterPlant {
            user_id: "user_1".to_string(),
            lat: 91.0,
            lng: 0.0,
            photo: vec![1],
            analysis: None,
        };
        assert!(matches!(
            params.validate(),
            Err(GroveError::InvalidInput { .. })
        ));

        let params = RegisterPlant {
            user_id: "user_1".to_string(),
            lat: 0.0,
            lng: f64::NAN,
            photo: vec![1],
            analysis: None,
        };
        assert!(matches!(
            params.validate(),
            Err(GroveError::InvalidInput { .. })
        ));
    }

    #[test]
    fn register_plant_accepts_valid_input() {
        let params = RegisterPlant {
            user_id: "user_1".to_string(),
            lat: 12.9716,
            lng: 77.5946,
            photo: vec![1, 2, 3],
            analysis: None,
        };
        let point = params.validate().unwrap();
        assert_eq!(point.lat, 12.9716);
        assert_eq!(point.lng, 77.5946);
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(Id::new("  ").validate().is_err());
        assert!(Id::new("user_1").validate().is_ok());

        let params = AdoptPlant {
            user_id: String::new(),
            plant_id: "plant_1".to_string(),
        };
        assert!(params.validate().is_err());

        let params = CompleteQuest {
            quest_id: "quest_1".to_string(),
            user_id: String::new(),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn list_user_quests_defaults_to_pending() {
        let json = r#"{"user_id": "user_1"}"#;
        let params: ListUserQuests = serde_json::from_str(json).unwrap();
        assert_eq!(params.status, QuestStatus::Pending);
    }
}
