//! Quest operations for the engine: the scheduler pass, nearby discovery,
//! listing, and completion.

use jiff::Timestamp;
use log::{info, warn};
use tokio::task;

use super::Grove;
use crate::{
    db::{utils::new_id, Database},
    display::{CompletionReceipt, ScheduleOutcome},
    error::{GroveError, Result},
    geo::{self, LatBand, NEARBY_RADIUS_METERS},
    models::{Quest, QuestStatus, QuestType, DEFAULT_REWARD_POINTS},
    params::{CompleteQuest, Id, ListUserQuests},
    schedule,
};

impl Grove {
    /// Runs one scheduler pass at the given instant, creating every quest
    /// that has come due, and returns the created quest IDs.
    ///
    /// The pass is externally triggered and does not reschedule itself. In a
    /// single-threaded setting it is idempotent: a second pass at the same
    /// instant finds every (plant, type) pair inside its recurrence window
    /// and creates nothing. Two passes racing each other can both create a
    /// quest for the same pair; that duplicate is tolerated (see the module
    /// docs in [`crate::engine`]).
    pub async fn run_scheduler_once(&self, now: Timestamp) -> Result<ScheduleOutcome> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let plants = db.list_plants()?;
            let mut created = Vec::new();

            for plant in &plants {
                for quest_type in QuestType::ALL {
                    let latest = db.latest_quest(&plant.id, quest_type)?;
                    if !schedule::quest_due(
                        now,
                        latest.map(|q| q.created_at),
                        quest_type.recurrence(),
                    ) {
                        continue;
                    }

                    let quest = Quest {
                        id: new_id("quest"),
                        plant_id: plant.id.clone(),
                        quest_type,
                        assigned_to: plant.adopted_by.clone().unwrap_or_default(),
                        status: QuestStatus::Pending,
                        reward_points: DEFAULT_REWARD_POINTS,
                        created_at: now,
                        proof: None,
                    };
                    db.insert_quest(&quest)?;
                    info!(
                        "scheduled {} quest {} for plant {}",
                        quest_type.as_str(),
                        quest.id,
                        plant.id
                    );
                    created.push(quest.id.clone());

                    // The quest record is committed; the list updates below
                    // are caches and must not undo it.
                    if let Err(e) = db.add_quest_ref(&plant.id, &quest.id) {
                        warn!(
                            "partial update: plant {} quest set missing {}: {e}",
                            plant.id, quest.id
                        );
                    }

                    if let Some(adopter) = &plant.adopted_by {
                        if schedule::surface_to_adopter(quest_type, plant.last_watered, now) {
                            if let Err(e) = db.add_active_quest(adopter, &quest.id) {
                                warn!(
                                    "partial update: user {adopter} active_quests missing {}: {e}",
                                    quest.id
                                );
                            }
                        }
                    }
                }
            }

            Ok(ScheduleOutcome { created })
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Pending quests on plants within [`NEARBY_RADIUS_METERS`] of the
    /// user's stored location.
    ///
    /// Fails with [`GroveError::UserLocationUnset`] when the user has never
    /// reported a location. Membership is decided by exact great-circle
    /// distance (inclusive at the boundary), never by the latitude pre-filter
    /// alone.
    pub async fn nearby_quests(&self, params: &Id) -> Result<Vec<Quest>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let user_id = params.id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;

            let user = db
                .get_user(&user_id)?
                .ok_or(GroveError::UserNotFound { id: user_id.clone() })?;
            let origin = user
                .location
                .ok_or(GroveError::UserLocationUnset { id: user_id })?;

            let band = LatBand::around(origin, NEARBY_RADIUS_METERS);
            let mut quests = Vec::new();
            for plant in db.plants_in_lat_band(band)? {
                if geo::is_within(origin, plant.location, NEARBY_RADIUS_METERS) {
                    quests.extend(db.pending_quests_for_plant(&plant.id)?);
                }
            }
            Ok(quests)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a quest by its ID.
    pub async fn get_quest(&self, params: &Id) -> Result<Option<Quest>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let quest_id = params.id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_quest(&quest_id)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists quests assigned to a user, filtered by status.
    pub async fn user_quests(&self, params: &ListUserQuests) -> Result<Vec<Quest>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let user_id = params.user_id.clone();
        let status = params.status;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.quests_by_assignee(&user_id, status)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Completes a pending quest and applies the reward.
    ///
    /// The conditional pending → completed flip is the durability anchor:
    /// only the invocation that wins it applies the reward and cache effects,
    /// so re-submitting a completed quest can never double-credit. The
    /// completing user is not required to match the quest's assignee
    /// (see DESIGN.md). Effects after the flip — the user's completed list
    /// and points, the plant's care timestamps and quest set — are each
    /// logged on failure and left to reconciliation rather than rolled back.
    pub async fn complete_quest(&self, params: &CompleteQuest) -> Result<CompletionReceipt> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let quest_id = params.quest_id.clone();
        let user_id = params.user_id.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;

            let quest = db
                .get_quest(&quest_id)?
                .ok_or(GroveError::QuestNotFound { id: quest_id.clone() })?;
            if quest.status == QuestStatus::Completed {
                return Err(GroveError::QuestAlreadyCompleted { id: quest_id });
            }
            if !db.user_exists(&user_id)? {
                return Err(GroveError::UserNotFound { id: user_id });
            }

            let now = Timestamp::now();
            if !db.complete_quest_if_pending(&quest_id, now, true)? {
                // Lost a race with another completer between the read above
                // and the flip.
                return Err(GroveError::QuestAlreadyCompleted { id: quest_id });
            }
            info!("quest {quest_id} completed by {user_id}");

            if let Err(e) = db.add_completed_quest(&user_id, &quest_id) {
                warn!("partial update: user {user_id} quests_completed missing {quest_id}: {e}");
            }
            if let Err(e) = db.increment_eco_points(&user_id, quest.reward_points) {
                warn!("partial update: user {user_id} reward for {quest_id} failed: {e}");
            }
            if let Err(e) = db.remove_active_quest(&user_id, &quest_id) {
                warn!("partial update: user {user_id} active_quests still lists {quest_id}: {e}");
            }

            match quest.quest_type {
                QuestType::WaterPlant => {
                    if let Err(e) = db.set_last_watered(&quest.plant_id, now) {
                        warn!("partial update: plant {} last_watered: {e}", quest.plant_id);
                    }
                }
                QuestType::HealthAssessment => {
                    if let Err(e) = db.set_last_health_assessment(&quest.plant_id, now) {
                        warn!(
                            "partial update: plant {} last_health_assessment: {e}",
                            quest.plant_id
                        );
                    }
                }
                QuestType::GrowthReport | QuestType::PhotoSubmission => {}
            }
            if let Err(e) = db.remove_quest_ref(&quest.plant_id, &quest_id) {
                warn!(
                    "partial update: plant {} quest set still lists {quest_id}: {e}",
                    quest.plant_id
                );
            }

            let completed = db
                .get_quest(&quest_id)?
                .ok_or(GroveError::QuestNotFound { id: quest_id })?;
            let reward_points = completed.reward_points;
            Ok(CompletionReceipt {
                quest: completed,
                reward_points,
            })
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
