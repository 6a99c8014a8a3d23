//! Scheduling decisions for recurring care quests.
//!
//! The scheduler walks every plant and every quest type and asks two
//! questions, both answered here as pure functions so they can be tested
//! without a store: is a new quest due, and should it appear in the adopter's
//! active list right away. Quest creation itself (and the cache updates that
//! follow) happens in [`crate::engine`].

use jiff::{SignedDuration, Timestamp};

use crate::models::QuestType;

/// Whether a new quest of a type is due for a plant.
///
/// Due when the plant has never had a quest of this type, or the most recent
/// one (pending or completed — the throttle counts both) was created at least
/// one recurrence window ago.
pub fn quest_due(now: Timestamp, last_created: Option<Timestamp>, window: SignedDuration) -> bool {
    match last_created {
        None => true,
        Some(last) => now.duration_since(last) >= window,
    }
}

/// Whether a freshly created quest should be surfaced in the adopter's
/// active-quest list.
///
/// Every type except WaterPlant is surfaced immediately. A WaterPlant quest
/// is held back when the plant was watered less than one recurrence window
/// ago — the quest record still exists for bookkeeping, but the user is not
/// nudged to water a plant they just watered. A plant that was never watered
/// does surface the quest.
pub fn surface_to_adopter(
    quest_type: QuestType,
    last_watered: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    if quest_type != QuestType::WaterPlant {
        return true;
    }
    match last_watered {
        None => true,
        Some(watered) => now.duration_since(watered) >= quest_type.recurrence(),
    }
}
