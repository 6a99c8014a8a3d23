//! End-to-end engine tests covering the full quest lifecycle.

use grove_core::{
    params::{AdoptPlant, CompleteQuest, Id, RegisterPlant, UpdateLocation},
    GroveBuilder, PlantAnalysis, QuestStatus, QuestType, DEFAULT_REWARD_POINTS,
    REGISTRATION_POINTS,
};
use image::{Rgb, RgbImage};
use jiff::Timestamp;
use tempfile::TempDir;

fn photo(seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(8, 8, |x, y| {
        if (x + y * 8) % (u32::from(seed) + 2) == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("png encode");
    buf
}

fn register(user: &str, lat: f64, lng: f64, species: &str, seed: u8) -> RegisterPlant {
    RegisterPlant {
        user_id: user.to_string(),
        lat,
        lng,
        photo: photo(seed),
        analysis: Some(PlantAnalysis::manual(species, Some("Test plant".to_string()))),
    }
}

#[tokio::test]
async fn full_quest_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let grove = GroveBuilder::new()
        .with_database_path(Some(tmp.path().join("grove.db")))
        .build()
        .await
        .unwrap();

    // A user registers a basil plant at the origin and adopts it.
    grove.create_user(&Id::new("alice")).await.unwrap();
    grove
        .update_user_location(&UpdateLocation {
            user_id: "alice".to_string(),
            lat: 0.0,
            lng: 0.0,
        })
        .await
        .unwrap();
    let receipt = grove
        .register_plant(&register("alice", 0.0, 0.0, "Ocimum basilicum", 1))
        .await
        .unwrap();
    grove
        .adopt_plant(&AdoptPlant {
            user_id: "alice".to_string(),
            plant_id: receipt.plant.id.clone(),
        })
        .await
        .unwrap();

    // The scheduler issues one quest per type for the fresh plant.
    let now = Timestamp::now();
    let outcome = grove.run_scheduler_once(now).await.unwrap();
    assert_eq!(outcome.created.len(), 4);

    // Every (plant, type) pair now has a quest created inside its window:
    // an immediate second pass creates nothing.
    assert!(grove.run_scheduler_once(now).await.unwrap().created.is_empty());

    // The quests are discoverable near the user's location.
    let nearby = grove.nearby_quests(&Id::new("alice")).await.unwrap();
    assert_eq!(nearby.len(), 4);
    assert!(nearby.iter().all(|q| q.status == QuestStatus::Pending));

    // Completing the water quest applies every cross-record effect.
    let water = nearby
        .iter()
        .find(|q| q.quest_type == QuestType::WaterPlant)
        .unwrap();
    let completion = grove
        .complete_quest(&CompleteQuest {
            quest_id: water.id.clone(),
            user_id: "alice".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(completion.reward_points, DEFAULT_REWARD_POINTS);

    let user = grove.get_user(&Id::new("alice")).await.unwrap().unwrap();
    assert_eq!(user.eco_points, REGISTRATION_POINTS + DEFAULT_REWARD_POINTS);
    assert_eq!(user.active_quests.len(), 3);
    assert_eq!(user.quests_completed, vec![water.id.clone()]);

    let plant = grove
        .get_plant(&Id::new(&receipt.plant.id))
        .await
        .unwrap()
        .unwrap();
    assert!(plant.last_watered.is_some());
    assert_eq!(plant.quests.len(), 3);

    // The completed quest no longer shows up nearby.
    let nearby = grove.nearby_quests(&Id::new("alice")).await.unwrap();
    assert_eq!(nearby.len(), 3);
    assert!(nearby.iter().all(|q| q.id != water.id));
}

#[tokio::test]
async fn scheduler_covers_every_pair_or_none_exists() {
    let tmp = TempDir::new().unwrap();
    let grove = GroveBuilder::new()
        .with_database_path(Some(tmp.path().join("grove.db")))
        .build()
        .await
        .unwrap();

    grove.create_user(&Id::new("bob")).await.unwrap();
    for (i, species) in ["Ficus lyrata", "Monstera deliciosa", "Ocimum basilicum"]
        .iter()
        .enumerate()
    {
        grove
            .register_plant(&register("bob", i as f64, 0.0, species, i as u8))
            .await
            .unwrap();
    }

    let now = Timestamp::now();
    grove.run_scheduler_once(now).await.unwrap();

    // Post-condition over every (plant, type) pair: a quest exists and its
    // creation time is inside the recurrence window.
    for plant in grove.list_plants().await.unwrap() {
        assert_eq!(plant.quests.len(), 4);
        let mut seen_types = Vec::new();
        for quest_id in &plant.quests {
            let quest = grove.get_quest(&Id::new(quest_id)).await.unwrap().unwrap();
            assert!(now.duration_since(quest.created_at) < quest.quest_type.recurrence());
            seen_types.push(quest.quest_type);
        }
        for quest_type in QuestType::ALL {
            assert!(seen_types.contains(&quest_type));
        }
    }
}
