//! Error types for the quest engine library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all Grove operations.
#[derive(Error, Debug)]
pub enum GroveError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plant not found for the given ID
    #[error("Plant with ID '{id}' not found")]
    PlantNotFound { id: String },
    /// Quest not found for the given ID
    #[error("Quest with ID '{id}' not found")]
    QuestNotFound { id: String },
    /// User not found for the given ID
    #[error("User with ID '{id}' not found")]
    UserNotFound { id: String },
    /// Registration rejected: an already-tracked plant of the same species
    /// sits at (practically) the same spot with a near-identical photo
    #[error("Duplicate plant detected nearby (species: {species}, matches plant '{plant_id}')")]
    DuplicateDetected { plant_id: String, species: String },
    /// Completion rejected: the quest has already been completed
    #[error("Quest '{id}' is already completed")]
    QuestAlreadyCompleted { id: String },
    /// The user has no stored location, so proximity queries cannot run
    #[error("User '{id}' has no stored location")]
    UserLocationUnset { id: String },
    /// Plant identification / health assessment service failure
    #[error("Identification service error: {0}")]
    Identification(String),
    /// The submitted photo could not be decoded into a fingerprint
    #[error("Image fingerprinting failed: {0}")]
    Fingerprint(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GroveError {
    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Creates an input validation error for a field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| GroveError::database_error(message, e))
    }
}

/// Result type alias for Grove operations
pub type Result<T> = std::result::Result<T, GroveError>;
