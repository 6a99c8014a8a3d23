//! User CRUD operations and queries.

use rusqlite::{params, OptionalExtension};

use super::utils::{decode_id_set, encode_id_set, set_remove, set_union};
use crate::{
    error::{DatabaseResultExt, GroveError, Result},
    geo::GeoPoint,
    models::User,
};

const INSERT_USER_SQL: &str = "INSERT OR IGNORE INTO users (id) VALUES (?1)";
const SELECT_USER_SQL: &str = "SELECT id, lat, lng, added_plants, adopted_plants, active_quests, quests_completed, eco_points FROM users WHERE id = ?1";
const CHECK_USER_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)";
const UPDATE_LOCATION_SQL: &str = "UPDATE users SET lat = ?1, lng = ?2 WHERE id = ?3";
// Atomic increment; the CHECK constraint keeps the balance non-negative.
const INCREMENT_POINTS_SQL: &str = "UPDATE users SET eco_points = eco_points + ?1 WHERE id = ?2";

const SELECT_ADDED_PLANTS_SQL: &str = "SELECT added_plants FROM users WHERE id = ?1";
const UPDATE_ADDED_PLANTS_SQL: &str = "UPDATE users SET added_plants = ?1 WHERE id = ?2";
const SELECT_ADOPTED_PLANTS_SQL: &str = "SELECT adopted_plants FROM users WHERE id = ?1";
const UPDATE_ADOPTED_PLANTS_SQL: &str = "UPDATE users SET adopted_plants = ?1 WHERE id = ?2";
const SELECT_ACTIVE_QUESTS_SQL: &str = "SELECT active_quests FROM users WHERE id = ?1";
const UPDATE_ACTIVE_QUESTS_SQL: &str = "UPDATE users SET active_quests = ?1 WHERE id = ?2";
const SELECT_COMPLETED_QUESTS_SQL: &str = "SELECT quests_completed FROM users WHERE id = ?1";
const UPDATE_COMPLETED_QUESTS_SQL: &str = "UPDATE users SET quests_completed = ?1 WHERE id = ?2";

impl super::Database {
    /// Helper to construct a User from a database row.
    fn build_user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let lat: Option<f64> = row.get(1)?;
        let lng: Option<f64> = row.get(2)?;
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        };

        let decode = |column: usize, raw: String| {
            decode_id_set(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    column,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        };

        Ok(User {
            id: row.get(0)?,
            location,
            added_plants: decode(3, row.get(3)?)?,
            adopted_plants: decode(4, row.get(4)?)?,
            active_quests: decode(5, row.get(5)?)?,
            quests_completed: decode(6, row.get(6)?)?,
            eco_points: row.get(7)?,
        })
    }

    /// Creates a user with empty lists and zero points. Re-creating an
    /// existing user is a no-op.
    pub fn create_user(&self, id: &str) -> Result<User> {
        self.connection
            .execute(INSERT_USER_SQL, params![id])
            .map_err(|e| GroveError::database_error("Failed to insert user", e))?;

        self.get_user(id)?.ok_or_else(|| GroveError::UserNotFound {
            id: id.to_string(),
        })
    }

    /// Retrieves a user by ID.
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_USER_SQL)
            .db_context("Failed to prepare user query")?;

        stmt.query_row(params![id], Self::build_user_from_row)
            .optional()
            .map_err(|e| GroveError::database_error("Failed to query user", e))
    }

    /// Whether a user record exists.
    pub fn user_exists(&self, id: &str) -> Result<bool> {
        self.connection
            .query_row(CHECK_USER_EXISTS_SQL, params![id], |row| row.get(0))
            .db_context("Failed to check user existence")
    }

    /// Stores the user's reported location.
    pub fn update_user_location(&self, user_id: &str, location: GeoPoint) -> Result<()> {
        let changed = self
            .connection
            .execute(
                UPDATE_LOCATION_SQL,
                params![location.lat, location.lng, user_id],
            )
            .map_err(|e| GroveError::database_error("Failed to update user location", e))?;
        if changed == 0 {
            return Err(GroveError::UserNotFound {
                id: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Atomically credits (or debits) eco-points.
    pub fn increment_eco_points(&self, user_id: &str, delta: i64) -> Result<()> {
        let changed = self
            .connection
            .execute(INCREMENT_POINTS_SQL, params![delta, user_id])
            .map_err(|e| GroveError::database_error("Failed to increment eco points", e))?;
        if changed == 0 {
            return Err(GroveError::UserNotFound {
                id: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Unions a plant into the user's added-plants list.
    pub fn add_added_plant(&mut self, user_id: &str, plant_id: &str) -> Result<()> {
        self.mutate_user_set(SELECT_ADDED_PLANTS_SQL, UPDATE_ADDED_PLANTS_SQL, user_id, |set| {
            set_union(set, plant_id)
        })
    }

    /// Unions a plant into the user's adopted-plants list.
    pub fn add_adopted_plant(&mut self, user_id: &str, plant_id: &str) -> Result<()> {
        self.mutate_user_set(
            SELECT_ADOPTED_PLANTS_SQL,
            UPDATE_ADOPTED_PLANTS_SQL,
            user_id,
            |set| set_union(set, plant_id),
        )
    }

    /// Unions a quest into the user's active list.
    pub fn add_active_quest(&mut self, user_id: &str, quest_id: &str) -> Result<()> {
        self.mutate_user_set(
            SELECT_ACTIVE_QUESTS_SQL,
            UPDATE_ACTIVE_QUESTS_SQL,
            user_id,
            |set| set_union(set, quest_id),
        )
    }

    /// Removes a quest from the user's active list.
    pub fn remove_active_quest(&mut self, user_id: &str, quest_id: &str) -> Result<()> {
        self.mutate_user_set(
            SELECT_ACTIVE_QUESTS_SQL,
            UPDATE_ACTIVE_QUESTS_SQL,
            user_id,
            |set| set_remove(set, quest_id),
        )
    }

    /// Unions a quest into the user's completed list.
    pub fn add_completed_quest(&mut self, user_id: &str, quest_id: &str) -> Result<()> {
        self.mutate_user_set(
            SELECT_COMPLETED_QUESTS_SQL,
            UPDATE_COMPLETED_QUESTS_SQL,
            user_id,
            |set| set_union(set, quest_id),
        )
    }

    /// Membership-checked read-modify-write over one JSON ID-set column,
    /// inside a transaction. Re-applying the same mutation is a no-op.
    fn mutate_user_set(
        &mut self,
        select_sql: &str,
        update_sql: &str,
        user_id: &str,
        apply: impl FnOnce(&mut Vec<String>) -> bool,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let raw: Option<String> = tx
            .query_row(select_sql, params![user_id], |row| row.get(0))
            .optional()
            .map_err(|e| GroveError::database_error("Failed to read user ID set", e))?;

        let Some(raw) = raw else {
            return Err(GroveError::UserNotFound {
                id: user_id.to_string(),
            });
        };

        let mut set = decode_id_set(&raw)?;
        if apply(&mut set) {
            tx.execute(update_sql, params![encode_id_set(&set)?, user_id])
                .map_err(|e| GroveError::database_error("Failed to write user ID set", e))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}
