//! Operation result types returned by the engine, with markdown Display.

use std::fmt;

use crate::models::{Plant, Quest};

/// Result of a successful plant registration.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    /// The newly created plant
    pub plant: Plant,
    /// Eco-points credited to the registering user
    pub eco_points_earned: i64,
}

impl fmt::Display for RegistrationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Registered {} ({}) with ID: {}",
            self.plant.species, self.plant.common_name, self.plant.id
        )?;
        writeln!(f, "Earned {} eco-points.", self.eco_points_earned)?;
        writeln!(f)?;
        write!(f, "{}", self.plant)
    }
}

/// Result of a successful quest completion.
#[derive(Debug, Clone)]
pub struct CompletionReceipt {
    /// The quest after its pending → completed transition
    pub quest: Quest,
    /// Eco-points awarded
    pub reward_points: i64,
}

impl fmt::Display for CompletionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Quest {} completed; {} eco-points awarded.",
            self.quest.id, self.reward_points
        )?;
        writeln!(f)?;
        write!(f, "{}", self.quest)
    }
}

/// Result of one scheduler pass.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    /// IDs of the quests created by this pass
    pub created: Vec<String>,
}

impl fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created.is_empty() {
            writeln!(f, "No quests due; nothing created.")?;
            return Ok(());
        }

        writeln!(f, "Created {} quest(s):", self.created.len())?;
        writeln!(f)?;
        for id in &self.created {
            writeln!(f, "- {id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schedule_outcome() {
        let output = format!("{}", ScheduleOutcome::default());
        assert!(output.contains("No quests due"));
    }

    #[test]
    fn schedule_outcome_lists_ids() {
        let outcome = ScheduleOutcome {
            created: vec!["quest_1".to_string(), "quest_2".to_string()],
        };
        let output = format!("{outcome}");
        assert!(output.contains("Created 2 quest(s):"));
        assert!(output.contains("- quest_1"));
        assert!(output.contains("- quest_2"));
    }
}
