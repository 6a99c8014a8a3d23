//! Plant model and the photo analysis audit record.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::geo::GeoPoint;

/// Type-safe enumeration of plant health statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// No disease findings
    Healthy,

    /// At least one disease finding
    Diseased,

    /// Never assessed
    #[default]
    Unknown,
}

impl HealthStatus {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Diseased => "diseased",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "diseased" => Ok(HealthStatus::Diseased),
            "unknown" => Ok(HealthStatus::Unknown),
            _ => Err(format!("Invalid health status: {s}")),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One disease finding from the health assessment service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Disease {
    /// Disease name
    pub name: String,

    /// Classifier probability in [0, 1]
    pub probability: f64,

    /// Short description of the condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Treatment guidance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

/// A tracked plant. Created once at registration, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    /// Unique identifier for the plant
    pub id: String,

    /// Scientific species name from identification
    pub species: String,

    /// Common name from identification
    pub common_name: String,

    /// Where the plant grows
    pub location: GeoPoint,

    /// Health score on the 0–10 scale
    pub health_score: f64,

    /// Health verdict from the latest assessment
    #[serde(default)]
    pub health_status: HealthStatus,

    /// When the plant was last watered via a completed WaterPlant quest
    pub last_watered: Option<Timestamp>,

    /// When the plant last had a completed HealthAssessment quest
    pub last_health_assessment: Option<Timestamp>,

    /// Adopting user, if any
    pub adopted_by: Option<String>,

    /// User who registered the plant
    pub added_by: String,

    /// Denormalized set of not-yet-completed quest IDs for this plant
    #[serde(default)]
    pub quests: Vec<String>,

    /// Disease findings from registration analysis
    #[serde(default)]
    pub diseases: Vec<Disease>,

    /// Perceptual fingerprint of the registration photo
    pub fingerprint: Fingerprint,

    /// Timestamp when the plant was registered (UTC)
    pub registered_at: Timestamp,
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.common_name, self.species)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(
            f,
            "- Location: {:.6}, {:.6}",
            self.location.lat, self.location.lng
        )?;
        writeln!(
            f,
            "- Health: {} ({:.1}/10)",
            self.health_status, self.health_score
        )?;
        match &self.adopted_by {
            Some(user) => writeln!(f, "- Adopted by: {user}")?,
            None => writeln!(f, "- Adopted by: (nobody yet)")?,
        }
        writeln!(f, "- Added by: {}", self.added_by)?;
        if let Some(watered) = &self.last_watered {
            writeln!(
                f,
                "- Last watered: {}",
                watered.strftime("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        writeln!(
            f,
            "- Registered: {}",
            self.registered_at.strftime("%Y-%m-%d %H:%M:%S UTC")
        )?;

        if !self.diseases.is_empty() {
            writeln!(f, "\n## Diseases")?;
            writeln!(f)?;
            for disease in &self.diseases {
                writeln!(
                    f,
                    "- {} ({:.0}%)",
                    disease.name,
                    disease.probability * 100.0
                )?;
            }
        }

        if !self.quests.is_empty() {
            writeln!(f, "\n## Open quests")?;
            writeln!(f)?;
            for quest_id in &self.quests {
                writeln!(f, "- {quest_id}")?;
            }
        }

        Ok(())
    }
}

/// Audit record of a registration photo analysis. Write-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    /// Unique identifier for the photo record
    pub id: String,

    /// Submitting user
    pub user_id: String,

    /// Plant the photo registered
    pub plant_id: String,

    /// Species the analysis settled on
    pub species: String,

    /// Health verdict at analysis time
    pub health_status: HealthStatus,

    /// Disease findings at analysis time
    #[serde(default)]
    pub diseases: Vec<Disease>,

    /// Timestamp of the analysis (UTC)
    pub taken_at: Timestamp,
}
