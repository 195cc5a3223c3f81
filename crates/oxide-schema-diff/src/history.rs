//! Migration history.
//!
//! Holds every recorded migration, ordered by id, and replays them into
//! snapshots. Histories are stored as a JSON array of migrations.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::{DiffError, Result};
use crate::migration::Migration;
use crate::schema::DiffableTable;
use crate::snapshot::SchemaSnapshot;

/// Recorded migrations, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationHistory {
    migrations: Vec<Migration>,
}

impl MigrationHistory {
    /// Creates a history, sorting migrations by id.
    ///
    /// Fails if two migrations share an id.
    pub fn new(mut migrations: Vec<Migration>) -> Result<Self> {
        let mut seen = HashSet::new();
        for migration in &migrations {
            if !seen.insert(migration.id.as_str()) {
                return Err(DiffError::DuplicateMigration(migration.id.clone()));
            }
        }
        migrations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { migrations })
    }

    /// Parses a history from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Loads a history file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let migrations = serde_json::from_str(&json).map_err(|e| DiffError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let history = Self::new(migrations)?;
        info!(
            path = %path.display(),
            migrations = history.len(),
            "Loaded migration history"
        );
        Ok(history)
    }

    /// Serializes the history as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.migrations)?)
    }

    /// Returns the migrations, oldest first.
    #[must_use]
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Returns the number of migrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns true if there are no migrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// Returns the id of the newest migration.
    #[must_use]
    pub fn latest_id(&self) -> Option<&str> {
        self.migrations.last().map(|m| m.id.as_str())
    }

    /// Replays every migration's forwards actions.
    pub fn snapshot(&self) -> Result<Vec<DiffableTable>> {
        SchemaSnapshot::new(self.migrations.iter().map(|m| &m.forwards)).get_snapshot()
    }

    /// Replays migrations up to and including `id`.
    pub fn snapshot_until(&self, id: &str) -> Result<Vec<DiffableTable>> {
        let end = self
            .migrations
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| DiffError::MigrationNotFound(id.to_string()))?;
        SchemaSnapshot::new(self.migrations[..=end].iter().map(|m| &m.forwards)).get_snapshot()
    }
}
