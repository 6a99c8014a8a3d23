//! Quest model: one recurring care task instance tied to one plant.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Reward credited for completing any quest.
pub const DEFAULT_REWARD_POINTS: i64 = 50;

/// Type-safe enumeration of quest types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// Water the plant
    WaterPlant,

    /// Photograph the plant for a health assessment
    HealthAssessment,

    /// Report on growth progress
    GrowthReport,

    /// Submit a fresh photo of the plant
    PhotoSubmission,
}

impl QuestType {
    /// All quest types, in scheduling order.
    pub const ALL: [QuestType; 4] = [
        QuestType::WaterPlant,
        QuestType::HealthAssessment,
        QuestType::GrowthReport,
        QuestType::PhotoSubmission,
    ];

    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestType::WaterPlant => "water_plant",
            QuestType::HealthAssessment => "health_assessment",
            QuestType::GrowthReport => "growth_report",
            QuestType::PhotoSubmission => "photo_submission",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestType::WaterPlant => "Water Plant",
            QuestType::HealthAssessment => "Health Assessment",
            QuestType::GrowthReport => "Growth Report",
            QuestType::PhotoSubmission => "Photo Submission",
        }
    }

    /// Minimum time between successive quests of this type for one plant.
    pub fn recurrence(&self) -> SignedDuration {
        match self {
            QuestType::WaterPlant => SignedDuration::from_hours(24),
            QuestType::HealthAssessment => SignedDuration::from_hours(3 * 24),
            QuestType::GrowthReport => SignedDuration::from_hours(3 * 24),
            QuestType::PhotoSubmission => SignedDuration::from_hours(7 * 24),
        }
    }
}

impl FromStr for QuestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "water_plant" => Ok(QuestType::WaterPlant),
            "health_assessment" => Ok(QuestType::HealthAssessment),
            "growth_report" => Ok(QuestType::GrowthReport),
            "photo_submission" => Ok(QuestType::PhotoSubmission),
            _ => Err(format!("Invalid quest type: {s}")),
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Type-safe enumeration of quest statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    /// Quest is open and waiting for proof
    #[default]
    Pending,

    /// Quest has been completed; terminal
    Completed,
}

impl QuestStatus {
    /// Database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Pending => "pending",
            QuestStatus::Completed => "completed",
        }
    }

    /// Status with a consistent icon for display contexts.
    pub fn with_icon(&self) -> &'static str {
        match self {
            QuestStatus::Pending => "○ Pending",
            QuestStatus::Completed => "✓ Completed",
        }
    }
}

impl FromStr for QuestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(QuestStatus::Pending),
            "completed" => Ok(QuestStatus::Completed),
            _ => Err(format!("Invalid quest status: {s}")),
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof-of-completion record, populated only on completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProofSubmission {
    /// When the proof was submitted (UTC)
    pub submitted_at: Timestamp,

    /// Whether the proof was accepted as valid
    pub verified: bool,
}

/// A recurring care task instance for one plant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    /// Unique identifier for the quest
    pub id: String,

    /// ID of the plant this quest cares for
    pub plant_id: String,

    /// Kind of care task
    #[serde(rename = "type")]
    pub quest_type: QuestType,

    /// User the quest is assigned to; empty when the plant is unadopted
    pub assigned_to: String,

    /// Current status
    #[serde(default)]
    pub status: QuestStatus,

    /// Eco-points credited on completion
    pub reward_points: i64,

    /// Timestamp when the quest was created (UTC)
    pub created_at: Timestamp,

    /// Proof of completion, set exactly once on the pending → completed
    /// transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofSubmission>,
}

impl fmt::Display for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({})",
            self.quest_type.display_name(),
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Plant: {}", self.plant_id)?;
        if self.assigned_to.is_empty() {
            writeln!(f, "- Assigned: (unassigned)")?;
        } else {
            writeln!(f, "- Assigned: {}", self.assigned_to)?;
        }
        writeln!(f, "- Reward: {} eco-points", self.reward_points)?;
        writeln!(
            f,
            "- Created: {}",
            self.created_at.strftime("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if let Some(proof) = &self.proof {
            writeln!(
                f,
                "- Proof: {} ({})",
                proof.submitted_at.strftime("%Y-%m-%d %H:%M:%S UTC"),
                if proof.verified { "verified" } else { "unverified" }
            )?;
        }
        Ok(())
    }
}
