//! Plant and user operations for the engine: registration, adoption, and
//! user record management.

use jiff::Timestamp;
use log::{info, warn};
use tokio::task;

use super::Grove;
use crate::{
    db::{utils::new_id, Database},
    display::RegistrationReceipt,
    error::{GroveError, Result},
    fingerprint::Fingerprint,
    models::{PhotoRecord, Plant, User, REGISTRATION_POINTS},
    params::{AdoptPlant, Id, RegisterPlant, UpdateLocation},
};

impl Grove {
    /// Registers a new plant from a photo.
    ///
    /// Runs identification (unless the caller pre-supplied an analysis),
    /// fingerprints the photo, and checks the duplicate guard before
    /// anything is written. A photo that cannot be fingerprinted fails the
    /// registration — unreadable image data never bypasses the guard. On
    /// success the registering user is credited [`REGISTRATION_POINTS`] and
    /// an analysis audit record is stored; failures of those follow-up
    /// writes are logged and do not undo the registration.
    pub async fn register_plant(&self, params: &RegisterPlant) -> Result<RegistrationReceipt> {
        let location = params.validate()?;

        let mut analysis = match &params.analysis {
            Some(analysis) => analysis.clone(),
            None => {
                let identifier =
                    self.identifier
                        .as_ref()
                        .ok_or_else(|| GroveError::Configuration {
                            message: "No identification service configured; supply an analysis"
                                .to_string(),
                        })?;
                identifier.analyze(&params.photo)?
            }
        };
        analysis.truncate_diseases();

        let db_path = self.db_path.clone();
        let guard = self.guard;
        let user_id = params.user_id.clone();
        let photo = params.photo.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;

            if !db.user_exists(&user_id)? {
                return Err(GroveError::UserNotFound { id: user_id });
            }

            let fingerprint = Fingerprint::from_image_bytes(&photo)?;
            guard.check(&db, analysis.species(), location, fingerprint)?;

            let now = Timestamp::now();
            let plant = Plant {
                id: new_id("plant"),
                species: analysis.species().to_string(),
                common_name: analysis.common_name().to_string(),
                location,
                health_score: analysis.health_score,
                health_status: analysis.health_status,
                last_watered: None,
                last_health_assessment: None,
                adopted_by: None,
                added_by: user_id.clone(),
                quests: Vec::new(),
                diseases: analysis.diseases.clone(),
                fingerprint,
                registered_at: now,
            };
            db.insert_plant(&plant)?;
            info!("registered plant {} ({})", plant.id, plant.species);

            // The plant record is committed; everything below is cache and
            // audit maintenance that a reconciliation pass can redo.
            if let Err(e) = db.add_added_plant(&user_id, &plant.id) {
                warn!(
                    "partial update: user {user_id} added_plants missing {}: {e}",
                    plant.id
                );
            }
            if let Err(e) = db.increment_eco_points(&user_id, REGISTRATION_POINTS) {
                warn!("partial update: user {user_id} registration credit failed: {e}");
            }

            let photo_record = PhotoRecord {
                id: new_id("photo"),
                user_id: user_id.clone(),
                plant_id: plant.id.clone(),
                species: plant.species.clone(),
                health_status: plant.health_status,
                diseases: plant.diseases.clone(),
                taken_at: now,
            };
            if let Err(e) = db.insert_photo(&photo_record) {
                warn!("partial update: photo record for {} failed: {e}", plant.id);
            }

            Ok(RegistrationReceipt {
                plant,
                eco_points_earned: REGISTRATION_POINTS,
            })
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Adopts a plant for a user.
    ///
    /// Both records must exist. Sets the plant's adopter and unions the plant
    /// into the user's adopted list; a failure of the list update after the
    /// adopter is set is logged, not propagated.
    pub async fn adopt_plant(&self, params: &AdoptPlant) -> Result<()> {
        params.validate()?;

        let db_path = self.db_path.clone();
        let user_id = params.user_id.clone();
        let plant_id = params.plant_id.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;

            if !db.user_exists(&user_id)? {
                return Err(GroveError::UserNotFound { id: user_id });
            }
            if db.get_plant(&plant_id)?.is_none() {
                return Err(GroveError::PlantNotFound { id: plant_id });
            }

            db.set_adopted_by(&plant_id, &user_id)?;
            if let Err(e) = db.add_adopted_plant(&user_id, &plant_id) {
                warn!("partial update: user {user_id} adopted_plants missing {plant_id}: {e}");
            }
            info!("plant {plant_id} adopted by {user_id}");
            Ok(())
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a plant by its ID.
    pub async fn get_plant(&self, params: &Id) -> Result<Option<Plant>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let plant_id = params.id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plant(&plant_id)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists every tracked plant.
    pub async fn list_plants(&self) -> Result<Vec<Plant>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_plants()
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Creates a user record. Idempotent: re-creating returns the existing
    /// record untouched.
    pub async fn create_user(&self, params: &Id) -> Result<User> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let user_id = params.id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.create_user(&user_id)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a user by ID.
    pub async fn get_user(&self, params: &Id) -> Result<Option<User>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let user_id = params.id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_user(&user_id)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Stores a user's reported location for nearby-quest discovery.
    pub async fn update_user_location(&self, params: &UpdateLocation) -> Result<()> {
        let location = params.validate()?;
        let db_path = self.db_path.clone();
        let user_id = params.user_id.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.update_user_location(&user_id, location)
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
