//! Duplicate-plant registration guard.
//!
//! A registration is rejected when an already-tracked plant of the same
//! species sits within a few meters and its registration photo fingerprint is
//! nearly identical to the new one. Proximity and similarity compose: either
//! alone is not enough (two basil pots in one garden are fine; one basil pot
//! photographed twice is not).

use log::debug;

use crate::db::Database;
use crate::error::{GroveError, Result};
use crate::fingerprint::{Fingerprint, DEFAULT_SIMILARITY_THRESHOLD};
use crate::geo::{self, GeoPoint, LatBand, DUPLICATE_RADIUS_METERS};

/// Composes the geofence and fingerprint comparison that gate plant
/// registration.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGuard {
    /// Exact-distance proximity radius in meters
    pub radius_meters: f64,
    /// Maximum Hamming distance still treated as the same plant. Raising it
    /// catches more re-registrations at the cost of rejecting distinct plants
    /// that photograph alike.
    pub similarity_threshold: u32,
}

impl Default for DuplicateGuard {
    fn default() -> Self {
        Self {
            radius_meters: DUPLICATE_RADIUS_METERS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl DuplicateGuard {
    /// Checks a candidate registration against every nearby plant of the same
    /// species.
    ///
    /// Candidates come from the latitude-band pre-filter and must pass the
    /// exact distance test before their fingerprints are compared. Returns
    /// [`GroveError::DuplicateDetected`] carrying the matched plant's ID when
    /// the new photo is within the similarity threshold of a stored one.
    pub fn check(
        &self,
        db: &Database,
        species: &str,
        location: GeoPoint,
        fingerprint: Fingerprint,
    ) -> Result<()> {
        let band = LatBand::around(location, self.radius_meters);
        let candidates = db.plants_in_lat_band(band)?;

        for existing in candidates {
            if !existing.species.eq_ignore_ascii_case(species) {
                continue;
            }
            if !geo::is_within(location, existing.location, self.radius_meters) {
                continue;
            }
            let distance = fingerprint.hamming_distance(existing.fingerprint);
            debug!(
                "duplicate check: candidate {} at hamming distance {distance}",
                existing.id
            );
            if distance <= self.similarity_threshold {
                return Err(GroveError::DuplicateDetected {
                    plant_id: existing.id,
                    species: existing.species,
                });
            }
        }
        Ok(())
    }
}
