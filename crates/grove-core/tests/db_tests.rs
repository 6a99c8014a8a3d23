use grove_core::{
    Database, Disease, Fingerprint, GeoPoint, GroveError, HealthStatus, Plant, Quest, QuestStatus,
    QuestType, DEFAULT_REWARD_POINTS,
};
use jiff::Timestamp;
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn sample_plant(id: &str, lat: f64) -> Plant {
    Plant {
        id: id.to_string(),
        species: "Ocimum basilicum".to_string(),
        common_name: "Basil".to_string(),
        location: GeoPoint::new(lat, 77.5946),
        health_score: 9.0,
        health_status: HealthStatus::Healthy,
        last_watered: None,
        last_health_assessment: None,
        adopted_by: None,
        added_by: "user_1".to_string(),
        quests: Vec::new(),
        diseases: vec![Disease {
            name: "downy mildew".to_string(),
            probability: 0.42,
            description: Some("Yellowing between leaf veins".to_string()),
            treatment: None,
        }],
        fingerprint: Fingerprint::from(0x00ff_00ff_00ff_00ff),
        registered_at: Timestamp::from_second(1640995200).unwrap(),
    }
}

fn sample_quest(id: &str, plant_id: &str, quest_type: QuestType, created_second: i64) -> Quest {
    Quest {
        id: id.to_string(),
        plant_id: plant_id.to_string(),
        quest_type,
        assigned_to: String::new(),
        status: QuestStatus::Pending,
        reward_points: DEFAULT_REWARD_POINTS,
        created_at: Timestamp::from_second(created_second).unwrap(),
        proof: None,
    }
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());

    // Re-opening an existing database applies the schema idempotently.
    let _again = Database::new(temp_file.path()).expect("Failed to reopen database");
}

#[test]
fn test_plant_round_trip() {
    let (_temp_file, db) = create_test_db();

    let plant = sample_plant("plant_1", 12.9716);
    db.insert_plant(&plant).expect("Failed to insert plant");

    let loaded = db
        .get_plant("plant_1")
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(loaded, plant);

    assert!(db.get_plant("plant_missing").unwrap().is_none());
}

#[test]
fn test_list_plants_ordered_by_registration() {
    let (_temp_file, db) = create_test_db();

    let mut older = sample_plant("plant_old", 0.0);
    older.registered_at = Timestamp::from_second(1000).unwrap();
    let mut newer = sample_plant("plant_new", 1.0);
    newer.registered_at = Timestamp::from_second(2000).unwrap();

    db.insert_plant(&newer).unwrap();
    db.insert_plant(&older).unwrap();

    let plants = db.list_plants().unwrap();
    assert_eq!(plants.len(), 2);
    assert_eq!(plants[0].id, "plant_old");
    assert_eq!(plants[1].id, "plant_new");
}

#[test]
fn test_lat_band_query_filters_by_latitude() {
    let (_temp_file, db) = create_test_db();

    db.insert_plant(&sample_plant("plant_a", 10.0)).unwrap();
    db.insert_plant(&sample_plant("plant_b", 10.00001)).unwrap();
    db.insert_plant(&sample_plant("plant_c", 40.0)).unwrap();

    let band = grove_core::geo::LatBand {
        lower: 9.9999,
        upper: 10.0001,
    };
    let hits = db.plants_in_lat_band(band).unwrap();
    let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["plant_a", "plant_b"]);
}

#[test]
fn test_adoption_and_quest_ref_maintenance() {
    let (_temp_file, mut db) = create_test_db();

    db.insert_plant(&sample_plant("plant_1", 0.0)).unwrap();
    db.set_adopted_by("plant_1", "user_1").unwrap();

    db.add_quest_ref("plant_1", "quest_1").unwrap();
    db.add_quest_ref("plant_1", "quest_2").unwrap();
    // Union semantics: adding again changes nothing.
    db.add_quest_ref("plant_1", "quest_1").unwrap();

    let plant = db.get_plant("plant_1").unwrap().unwrap();
    assert_eq!(plant.adopted_by.as_deref(), Some("user_1"));
    assert_eq!(plant.quests, vec!["quest_1", "quest_2"]);

    db.remove_quest_ref("plant_1", "quest_1").unwrap();
    db.remove_quest_ref("plant_1", "quest_1").unwrap();
    let plant = db.get_plant("plant_1").unwrap().unwrap();
    assert_eq!(plant.quests, vec!["quest_2"]);
}

#[test]
fn test_adopting_a_missing_plant_fails() {
    let (_temp_file, db) = create_test_db();
    let err = db.set_adopted_by("plant_missing", "user_1").unwrap_err();
    assert!(matches!(err, GroveError::PlantNotFound { .. }));
}

#[test]
fn test_quest_round_trip_and_latest() {
    let (_temp_file, db) = create_test_db();

    db.insert_quest(&sample_quest("quest_1", "plant_1", QuestType::WaterPlant, 1000))
        .unwrap();
    db.insert_quest(&sample_quest("quest_2", "plant_1", QuestType::WaterPlant, 2000))
        .unwrap();
    db.insert_quest(&sample_quest(
        "quest_3",
        "plant_1",
        QuestType::GrowthReport,
        3000,
    ))
    .unwrap();

    let loaded = db.get_quest("quest_1").unwrap().unwrap();
    assert_eq!(loaded.quest_type, QuestType::WaterPlant);
    assert_eq!(loaded.status, QuestStatus::Pending);
    assert!(loaded.proof.is_none());

    // Latest is per (plant, type), by creation time descending.
    let latest = db.latest_quest("plant_1", QuestType::WaterPlant).unwrap().unwrap();
    assert_eq!(latest.id, "quest_2");
    assert!(db
        .latest_quest("plant_1", QuestType::PhotoSubmission)
        .unwrap()
        .is_none());
}

#[test]
fn test_pending_quests_for_plant_excludes_completed() {
    let (_temp_file, db) = create_test_db();

    db.insert_quest(&sample_quest("quest_1", "plant_1", QuestType::WaterPlant, 1000))
        .unwrap();
    db.insert_quest(&sample_quest(
        "quest_2",
        "plant_1",
        QuestType::GrowthReport,
        2000,
    ))
    .unwrap();
    db.insert_quest(&sample_quest("quest_3", "plant_2", QuestType::WaterPlant, 3000))
        .unwrap();

    let flipped = db
        .complete_quest_if_pending("quest_1", Timestamp::from_second(5000).unwrap(), true)
        .unwrap();
    assert!(flipped);

    let pending = db.pending_quests_for_plant("plant_1").unwrap();
    let ids: Vec<&str> = pending.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["quest_2"]);
}

#[test]
fn test_complete_quest_flips_exactly_once() {
    let (_temp_file, db) = create_test_db();

    db.insert_quest(&sample_quest("quest_1", "plant_1", QuestType::WaterPlant, 1000))
        .unwrap();

    let at = Timestamp::from_second(5000).unwrap();
    assert!(db.complete_quest_if_pending("quest_1", at, true).unwrap());
    // Second attempt loses the conditional update.
    assert!(!db.complete_quest_if_pending("quest_1", at, true).unwrap());

    let quest = db.get_quest("quest_1").unwrap().unwrap();
    assert_eq!(quest.status, QuestStatus::Completed);
    let proof = quest.proof.expect("proof recorded");
    assert_eq!(proof.submitted_at, at);
    assert!(proof.verified);
}

#[test]
fn test_quests_by_assignee() {
    let (_temp_file, db) = create_test_db();

    let mut assigned = sample_quest("quest_1", "plant_1", QuestType::WaterPlant, 1000);
    assigned.assigned_to = "user_1".to_string();
    db.insert_quest(&assigned).unwrap();
    db.insert_quest(&sample_quest("quest_2", "plant_1", QuestType::GrowthReport, 2000))
        .unwrap();

    let pending = db.quests_by_assignee("user_1", QuestStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "quest_1");

    let completed = db
        .quests_by_assignee("user_1", QuestStatus::Completed)
        .unwrap();
    assert!(completed.is_empty());
}

#[test]
fn test_user_lifecycle() {
    let (_temp_file, mut db) = create_test_db();

    let user = db.create_user("user_1").unwrap();
    assert_eq!(user.id, "user_1");
    assert_eq!(user.eco_points, 0);
    assert!(user.location.is_none());

    // Creation is idempotent; existing state is preserved.
    db.increment_eco_points("user_1", 100).unwrap();
    let again = db.create_user("user_1").unwrap();
    assert_eq!(again.eco_points, 100);

    db.update_user_location("user_1", GeoPoint::new(12.5, 77.5))
        .unwrap();
    let user = db.get_user("user_1").unwrap().unwrap();
    assert_eq!(user.location, Some(GeoPoint::new(12.5, 77.5)));

    assert!(db.user_exists("user_1").unwrap());
    assert!(!db.user_exists("ghost").unwrap());

    let err = db
        .update_user_location("ghost", GeoPoint::new(0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, GroveError::UserNotFound { .. }));
}

#[test]
fn test_user_id_sets_are_idempotent() {
    let (_temp_file, mut db) = create_test_db();
    db.create_user("user_1").unwrap();

    db.add_active_quest("user_1", "quest_1").unwrap();
    db.add_active_quest("user_1", "quest_1").unwrap();
    db.add_completed_quest("user_1", "quest_0").unwrap();
    db.add_added_plant("user_1", "plant_1").unwrap();
    db.add_adopted_plant("user_1", "plant_1").unwrap();

    let user = db.get_user("user_1").unwrap().unwrap();
    assert_eq!(user.active_quests, vec!["quest_1"]);
    assert_eq!(user.quests_completed, vec!["quest_0"]);
    assert_eq!(user.added_plants, vec!["plant_1"]);
    assert_eq!(user.adopted_plants, vec!["plant_1"]);

    db.remove_active_quest("user_1", "quest_1").unwrap();
    db.remove_active_quest("user_1", "quest_1").unwrap();
    let user = db.get_user("user_1").unwrap().unwrap();
    assert!(user.active_quests.is_empty());

    let err = db.add_active_quest("ghost", "quest_1").unwrap_err();
    assert!(matches!(err, GroveError::UserNotFound { .. }));
}
