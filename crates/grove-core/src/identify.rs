//! Plant identification and health assessment interface.
//!
//! Identification is an external vendor service. The engine consumes it
//! through the [`PlantIdentifier`] trait so the HTTP adapter lives at the
//! application edge and tests can substitute a canned implementation; the
//! service handle is injected through the engine builder, never reached
//! through module-level state.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Disease, HealthStatus};

/// Health score reported for a plant the service judges healthy.
pub const HEALTHY_SCORE: f64 = 9.0;
/// Health score reported for a plant with disease findings.
pub const DISEASED_SCORE: f64 = 5.0;
/// Fallback score when no assessment is available (manual registration).
pub const UNASSESSED_SCORE: f64 = 7.0;

/// Maximum number of disease findings retained per analysis.
pub const MAX_DISEASES: usize = 2;

/// One species candidate from the identification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesSuggestion {
    /// Scientific name, e.g. "Ocimum basilicum"
    pub name: String,
    /// Classifier probability in [0, 1]
    pub probability: f64,
    /// Common names, best first
    #[serde(default)]
    pub common_names: Vec<String>,
}

/// Combined identification + health assessment result for one photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantAnalysis {
    /// Species candidates ordered by probability descending
    pub suggestions: Vec<SpeciesSuggestion>,
    /// Overall health verdict
    pub health_status: HealthStatus,
    /// Health score on the 0–10 scale
    pub health_score: f64,
    /// Disease findings, at most [`MAX_DISEASES`], highest probability first
    pub diseases: Vec<Disease>,
}

impl PlantAnalysis {
    /// Scientific name of the top suggestion, or "Unknown".
    pub fn species(&self) -> &str {
        self.suggestions
            .first()
            .map_or("Unknown", |s| s.name.as_str())
    }

    /// First common name of the top suggestion, or "Unknown".
    pub fn common_name(&self) -> &str {
        self.suggestions
            .first()
            .and_then(|s| s.common_names.first())
            .map_or("Unknown", |n| n.as_str())
    }

    /// Analysis for a manually entered registration, with no service verdict.
    pub fn manual(species: impl Into<String>, common_name: Option<String>) -> Self {
        Self {
            suggestions: vec![SpeciesSuggestion {
                name: species.into(),
                probability: 1.0,
                common_names: common_name.into_iter().collect(),
            }],
            health_status: HealthStatus::Unknown,
            health_score: UNASSESSED_SCORE,
            diseases: Vec::new(),
        }
    }

    /// Keeps the strongest [`MAX_DISEASES`] findings, probability descending.
    pub fn truncate_diseases(&mut self) {
        self.diseases.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.diseases.truncate(MAX_DISEASES);
    }
}

/// External identification / health assessment service.
///
/// `analyze` must reject photos the service does not recognize as a plant by
/// returning [`crate::GroveError::Identification`]; service transport
/// failures propagate the same way and are not retried here.
pub trait PlantIdentifier: Send + Sync {
    fn analyze(&self, image: &[u8]) -> Result<PlantAnalysis>;
}
