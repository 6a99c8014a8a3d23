//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, GroveError, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Databases created before health-assessment tracking lack the
        // last_health_assessment column on plants.
        let has_assessment_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('plants') WHERE name = 'last_health_assessment'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_assessment_column {
            self.connection
                .execute(
                    "ALTER TABLE plants ADD COLUMN last_health_assessment TEXT",
                    [],
                )
                .map_err(|e| {
                    GroveError::database_error(
                        "Failed to add last_health_assessment column to plants table",
                        e,
                    )
                })?;
        }

        Ok(())
    }
}
