//! Plant CRUD operations and queries, plus the photo audit trail.

use rusqlite::{params, types::Type, OptionalExtension};

use super::utils::{
    decode_id_set, encode_id_set, parse_timestamp, parse_timestamp_opt, set_remove, set_union,
};
use crate::{
    error::{DatabaseResultExt, GroveError, Result},
    fingerprint::Fingerprint,
    geo::{GeoPoint, LatBand},
    models::{HealthStatus, PhotoRecord, Plant},
};

const PLANT_COLUMNS: &str = "id, species, common_name, lat, lng, health_score, health_status, \
     last_watered, last_health_assessment, adopted_by, added_by, quests, diseases, fingerprint, \
     registered_at";

const INSERT_PLANT_SQL: &str = "INSERT INTO plants (id, species, common_name, lat, lng, health_score, health_status, last_watered, last_health_assessment, adopted_by, added_by, quests, diseases, fingerprint, registered_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";
const SELECT_PLANT_SQL: &str = "SELECT id, species, common_name, lat, lng, health_score, health_status, last_watered, last_health_assessment, adopted_by, added_by, quests, diseases, fingerprint, registered_at FROM plants WHERE id = ?1";
const UPDATE_ADOPTED_BY_SQL: &str = "UPDATE plants SET adopted_by = ?1 WHERE id = ?2";
const UPDATE_LAST_WATERED_SQL: &str = "UPDATE plants SET last_watered = ?1 WHERE id = ?2";
const UPDATE_LAST_ASSESSMENT_SQL: &str =
    "UPDATE plants SET last_health_assessment = ?1 WHERE id = ?2";
const SELECT_PLANT_QUESTS_SQL: &str = "SELECT quests FROM plants WHERE id = ?1";
const UPDATE_PLANT_QUESTS_SQL: &str = "UPDATE plants SET quests = ?1 WHERE id = ?2";
const INSERT_PHOTO_SQL: &str = "INSERT INTO photos (id, user_id, plant_id, species, health_status, diseases, taken_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

impl super::Database {
    /// Helper to construct a Plant from a database row.
    fn build_plant_from_row(row: &rusqlite::Row) -> rusqlite::Result<Plant> {
        let health_str: String = row.get(6)?;
        let health_status = health_str.parse::<HealthStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, Type::Text, e.into())
        })?;

        let quests_raw: String = row.get(11)?;
        let quests = decode_id_set(&quests_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e))
        })?;

        let diseases_raw: String = row.get(12)?;
        let diseases = serde_json::from_str(&diseases_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e))
        })?;

        let fingerprint_raw: String = row.get(13)?;
        let fingerprint = Fingerprint::from_hex(&fingerprint_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(13, Type::Text, Box::new(e))
        })?;

        Ok(Plant {
            id: row.get(0)?,
            species: row.get(1)?,
            common_name: row.get(2)?,
            location: GeoPoint::new(row.get(3)?, row.get(4)?),
            health_score: row.get(5)?,
            health_status,
            last_watered: parse_timestamp_opt(7, row.get(7)?)?,
            last_health_assessment: parse_timestamp_opt(8, row.get(8)?)?,
            adopted_by: row.get(9)?,
            added_by: row.get(10)?,
            quests,
            diseases,
            fingerprint,
            registered_at: parse_timestamp(14, &row.get::<_, String>(14)?)?,
        })
    }

    /// Inserts a fully-built plant record.
    pub fn insert_plant(&self, plant: &Plant) -> Result<()> {
        let diseases_json = serde_json::to_string(&plant.diseases)?;

        self.connection
            .execute(
                INSERT_PLANT_SQL,
                params![
                    plant.id,
                    plant.species,
                    plant.common_name,
                    plant.location.lat,
                    plant.location.lng,
                    plant.health_score,
                    plant.health_status.as_str(),
                    plant.last_watered.map(|t| t.to_string()),
                    plant.last_health_assessment.map(|t| t.to_string()),
                    plant.adopted_by,
                    plant.added_by,
                    encode_id_set(&plant.quests)?,
                    diseases_json,
                    plant.fingerprint.to_string(),
                    plant.registered_at.to_string(),
                ],
            )
            .map_err(|e| GroveError::database_error("Failed to insert plant", e))?;
        Ok(())
    }

    /// Retrieves a plant by its ID.
    pub fn get_plant(&self, id: &str) -> Result<Option<Plant>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PLANT_SQL)
            .db_context("Failed to prepare plant query")?;

        stmt.query_row(params![id], Self::build_plant_from_row)
            .optional()
            .map_err(|e| GroveError::database_error("Failed to query plant", e))
    }

    /// Lists every tracked plant, oldest registration first.
    pub fn list_plants(&self) -> Result<Vec<Plant>> {
        let sql = format!("SELECT {PLANT_COLUMNS} FROM plants ORDER BY registered_at");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare plant list query")?;

        let plants = stmt
            .query_map([], Self::build_plant_from_row)
            .db_context("Failed to list plants")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plant rows")?;
        Ok(plants)
    }

    /// Range query over the latitude index: every plant inside the band.
    /// Over-inclusive by design; callers must follow with an exact distance
    /// check.
    pub fn plants_in_lat_band(&self, band: LatBand) -> Result<Vec<Plant>> {
        let sql = format!("SELECT {PLANT_COLUMNS} FROM plants WHERE lat >= ?1 AND lat <= ?2");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare latitude band query")?;

        let plants = stmt
            .query_map(params![band.lower, band.upper], Self::build_plant_from_row)
            .db_context("Failed to query latitude band")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plant rows")?;
        Ok(plants)
    }

    /// Records the adopting user on a plant.
    pub fn set_adopted_by(&self, plant_id: &str, user_id: &str) -> Result<()> {
        let changed = self
            .connection
            .execute(UPDATE_ADOPTED_BY_SQL, params![user_id, plant_id])
            .map_err(|e| GroveError::database_error("Failed to set adopter", e))?;
        if changed == 0 {
            return Err(GroveError::PlantNotFound {
                id: plant_id.to_string(),
            });
        }
        Ok(())
    }

    /// Stamps the last-watered time.
    pub fn set_last_watered(&self, plant_id: &str, at: jiff::Timestamp) -> Result<()> {
        self.connection
            .execute(UPDATE_LAST_WATERED_SQL, params![at.to_string(), plant_id])
            .map_err(|e| GroveError::database_error("Failed to set last_watered", e))?;
        Ok(())
    }

    /// Stamps the last-health-assessment time.
    pub fn set_last_health_assessment(&self, plant_id: &str, at: jiff::Timestamp) -> Result<()> {
        self.connection
            .execute(UPDATE_LAST_ASSESSMENT_SQL, params![at.to_string(), plant_id])
            .map_err(|e| GroveError::database_error("Failed to set last_health_assessment", e))?;
        Ok(())
    }

    /// Unions a quest ID into a plant's quest set. No-op when already
    /// present, so retries are safe.
    pub fn add_quest_ref(&mut self, plant_id: &str, quest_id: &str) -> Result<()> {
        self.mutate_plant_quests(plant_id, |quests| set_union(quests, quest_id))
    }

    /// Removes a quest ID from a plant's quest set. No-op when absent.
    pub fn remove_quest_ref(&mut self, plant_id: &str, quest_id: &str) -> Result<()> {
        self.mutate_plant_quests(plant_id, |quests| set_remove(quests, quest_id))
    }

    fn mutate_plant_quests(
        &mut self,
        plant_id: &str,
        apply: impl FnOnce(&mut Vec<String>) -> bool,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let raw: Option<String> = tx
            .query_row(SELECT_PLANT_QUESTS_SQL, params![plant_id], |row| row.get(0))
            .optional()
            .map_err(|e| GroveError::database_error("Failed to read plant quest set", e))?;

        let Some(raw) = raw else {
            return Err(GroveError::PlantNotFound {
                id: plant_id.to_string(),
            });
        };

        let mut quests = decode_id_set(&raw)?;
        if apply(&mut quests) {
            tx.execute(
                UPDATE_PLANT_QUESTS_SQL,
                params![encode_id_set(&quests)?, plant_id],
            )
            .map_err(|e| GroveError::database_error("Failed to write plant quest set", e))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Inserts a registration photo analysis record.
    pub fn insert_photo(&self, photo: &PhotoRecord) -> Result<()> {
        let diseases_json = serde_json::to_string(&photo.diseases)?;
        self.connection
            .execute(
                INSERT_PHOTO_SQL,
                params![
                    photo.id,
                    photo.user_id,
                    photo.plant_id,
                    photo.species,
                    photo.health_status.as_str(),
                    diseases_json,
                    photo.taken_at.to_string(),
                ],
            )
            .map_err(|e| GroveError::database_error("Failed to insert photo record", e))?;
        Ok(())
    }
}
