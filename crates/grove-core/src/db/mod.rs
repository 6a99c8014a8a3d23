//! Database operations and SQLite management for plants, quests, and users.
//!
//! This module is the store client: point reads by ID, filtered and ordered
//! range queries, atomic numeric increments, and membership-checked set
//! union/removal over JSON-encoded array columns. Multi-statement writes run
//! in transactions; cross-aggregate consistency is the engine's job.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod plant_queries;
pub mod quest_queries;
pub mod user_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
