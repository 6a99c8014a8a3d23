//! Quest CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use super::utils::{parse_timestamp, parse_timestamp_opt};
use crate::{
    error::{DatabaseResultExt, GroveError, Result},
    models::{ProofSubmission, Quest, QuestStatus, QuestType},
};

const INSERT_QUEST_SQL: &str = "INSERT INTO quests (id, plant_id, type, assigned_to, status, reward_points, created_at, proof_submitted_at, proof_verified) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const SELECT_QUEST_SQL: &str = "SELECT id, plant_id, type, assigned_to, status, reward_points, created_at, proof_submitted_at, proof_verified FROM quests WHERE id = ?1";
const SELECT_LATEST_QUEST_SQL: &str = "SELECT id, plant_id, type, assigned_to, status, reward_points, created_at, proof_submitted_at, proof_verified FROM quests WHERE plant_id = ?1 AND type = ?2 ORDER BY created_at DESC LIMIT 1";
const SELECT_PENDING_FOR_PLANT_SQL: &str = "SELECT id, plant_id, type, assigned_to, status, reward_points, created_at, proof_submitted_at, proof_verified FROM quests WHERE plant_id = ?1 AND status = 'pending' ORDER BY created_at";
const SELECT_BY_ASSIGNEE_STATUS_SQL: &str = "SELECT id, plant_id, type, assigned_to, status, reward_points, created_at, proof_submitted_at, proof_verified FROM quests WHERE assigned_to = ?1 AND status = ?2 ORDER BY created_at";
// The status flip is conditional on the quest still being pending; the
// affected-row count tells the caller whether this invocation won the
// transition.
const COMPLETE_QUEST_SQL: &str = "UPDATE quests SET status = 'completed', proof_submitted_at = ?1, proof_verified = ?2 WHERE id = ?3 AND status = 'pending'";

impl super::Database {
    /// Helper to construct a Quest from a database row.
    fn build_quest_from_row(row: &rusqlite::Row) -> rusqlite::Result<Quest> {
        let type_str: String = row.get(2)?;
        let quest_type = type_str.parse::<QuestType>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into())
        })?;

        let status_str: String = row.get(4)?;
        let status = status_str.parse::<QuestStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
        })?;

        let proof = match parse_timestamp_opt(7, row.get(7)?)? {
            Some(submitted_at) => Some(ProofSubmission {
                submitted_at,
                verified: row.get(8)?,
            }),
            None => None,
        };

        Ok(Quest {
            id: row.get(0)?,
            plant_id: row.get(1)?,
            quest_type,
            assigned_to: row.get(3)?,
            status,
            reward_points: row.get(5)?,
            created_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
            proof,
        })
    }

    /// Inserts a fully-built quest record.
    pub fn insert_quest(&self, quest: &Quest) -> Result<()> {
        self.connection
            .execute(
                INSERT_QUEST_SQL,
                params![
                    quest.id,
                    quest.plant_id,
                    quest.quest_type.as_str(),
                    quest.assigned_to,
                    quest.status.as_str(),
                    quest.reward_points,
                    quest.created_at.to_string(),
                    quest.proof.map(|p| p.submitted_at.to_string()),
                    quest.proof.map(|p| p.verified).unwrap_or(false),
                ],
            )
            .map_err(|e| GroveError::database_error("Failed to insert quest", e))?;
        Ok(())
    }

    /// Retrieves a quest by its ID.
    pub fn get_quest(&self, id: &str) -> Result<Option<Quest>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_QUEST_SQL)
            .db_context("Failed to prepare quest query")?;

        stmt.query_row(params![id], Self::build_quest_from_row)
            .optional()
            .map_err(|e| GroveError::database_error("Failed to query quest", e))
    }

    /// The most recently created quest of a (plant, type) pair, pending or
    /// completed. Creation-time ties resolve arbitrarily.
    pub fn latest_quest(&self, plant_id: &str, quest_type: QuestType) -> Result<Option<Quest>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_LATEST_QUEST_SQL)
            .db_context("Failed to prepare latest quest query")?;

        stmt.query_row(
            params![plant_id, quest_type.as_str()],
            Self::build_quest_from_row,
        )
        .optional()
        .map_err(|e| GroveError::database_error("Failed to query latest quest", e))
    }

    /// All pending quests attached to a plant.
    pub fn pending_quests_for_plant(&self, plant_id: &str) -> Result<Vec<Quest>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PENDING_FOR_PLANT_SQL)
            .db_context("Failed to prepare pending quest query")?;

        let quests = stmt
            .query_map(params![plant_id], Self::build_quest_from_row)
            .db_context("Failed to query pending quests")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read quest rows")?;
        Ok(quests)
    }

    /// All quests assigned to a user with the given status.
    pub fn quests_by_assignee(&self, user_id: &str, status: QuestStatus) -> Result<Vec<Quest>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_BY_ASSIGNEE_STATUS_SQL)
            .db_context("Failed to prepare assignee quest query")?;

        let quests = stmt
            .query_map(params![user_id, status.as_str()], Self::build_quest_from_row)
            .db_context("Failed to query assignee quests")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read quest rows")?;
        Ok(quests)
    }

    /// Flips a quest to completed and records the proof, only if it is still
    /// pending. Returns whether this call performed the transition — the
    /// durability anchor for the completion effects.
    pub fn complete_quest_if_pending(
        &self,
        quest_id: &str,
        submitted_at: Timestamp,
        verified: bool,
    ) -> Result<bool> {
        let changed = self
            .connection
            .execute(
                COMPLETE_QUEST_SQL,
                params![submitted_at.to_string(), verified, quest_id],
            )
            .map_err(|e| GroveError::database_error("Failed to complete quest", e))?;
        Ok(changed == 1)
    }
}
