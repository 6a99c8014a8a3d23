//! Builder for creating and configuring Grove instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;

use super::Grove;
use crate::{
    db::Database,
    error::{GroveError, Result},
    guard::DuplicateGuard,
    identify::PlantIdentifier,
};

/// Builder for creating and configuring Grove instances.
#[derive(Default)]
pub struct GroveBuilder {
    database_path: Option<PathBuf>,
    identifier: Option<Arc<dyn PlantIdentifier>>,
    guard: Option<DuplicateGuard>,
}

impl GroveBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/grove/grove.db` or `~/.local/share/grove/grove.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Injects the plant identification service.
    ///
    /// Registration with photo-only input requires one; registrations that
    /// pre-supply an analysis work without it.
    pub fn with_identifier(mut self, identifier: Arc<dyn PlantIdentifier>) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Overrides the duplicate guard's proximity radius and similarity
    /// threshold.
    pub fn with_duplicate_guard(mut self, guard: DuplicateGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `GroveError::FileSystem` if the database path is invalid
    /// Returns `GroveError::Database` if database initialization fails
    pub async fn build(self) -> Result<Grove> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GroveError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), GroveError>(())
        })
        .await
        .map_err(|e| GroveError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Grove::new(
            db_path,
            self.identifier,
            self.guard.unwrap_or_default(),
        ))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("grove")
            .place_data_file("grove.db")
            .map_err(|e| GroveError::XdgDirectory(e.to_string()))
    }
}
