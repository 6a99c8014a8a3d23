//! Collection wrapper types with markdown Display implementations.

use std::fmt;

use crate::models::{Plant, Quest};

/// A list of quests with a count header.
pub struct QuestList(pub Vec<Quest>);

impl fmt::Display for QuestList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No quests found.")?;
            return Ok(());
        }

        writeln!(f, "## Quests ({})", self.0.len())?;
        writeln!(f)?;
        for quest in &self.0 {
            write!(f, "{quest}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A compact one-line-per-plant listing.
pub struct PlantList(pub Vec<Plant>);

impl fmt::Display for PlantList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plants registered.")?;
            return Ok(());
        }

        writeln!(f, "## Plants ({})", self.0.len())?;
        writeln!(f)?;
        for plant in &self.0 {
            writeln!(
                f,
                "- {} — {} ({}), health {} {:.1}/10, {} open quest(s)",
                plant.id,
                plant.common_name,
                plant.species,
                plant.health_status,
                plant.health_score,
                plant.quests.len()
            )?;
        }
        Ok(())
    }
}
