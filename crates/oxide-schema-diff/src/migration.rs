//! Migration units.
//!
//! A migration pairs an id (which orders it among the others) with a
//! forwards manager and an optional backwards manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::manager::MigrationManager;

/// Format of generated migration ids. Lexical order is chronological.
pub const MIGRATION_ID_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Generates a migration id for the given instant.
#[must_use]
pub fn generate_migration_id(now: DateTime<Utc>) -> String {
    now.format(MIGRATION_ID_FORMAT).to_string()
}

/// One recorded migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    /// Migration id, e.g. `2026-10-19T08:30:00`.
    pub id: String,
    /// Actions applied when migrating forwards.
    pub forwards: MigrationManager,
    /// Actions applied when migrating backwards, if written by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backwards: Option<MigrationManager>,
}

impl Migration {
    /// Creates a migration with no explicit backwards manager.
    #[must_use]
    pub fn new(id: impl Into<String>, forwards: MigrationManager) -> Self {
        Self {
            id: id.into(),
            forwards,
            backwards: None,
        }
    }

    /// Sets an explicit backwards manager.
    #[must_use]
    pub fn with_backwards(mut self, backwards: MigrationManager) -> Self {
        self.backwards = Some(backwards);
        self
    }

    /// Returns the backwards manager, deriving it from the forwards actions
    /// when none was given.
    pub fn backwards_manager(&self) -> Result<MigrationManager> {
        match &self.backwards {
            Some(backwards) => Ok(backwards.clone()),
            None => self.forwards.reversed(),
        }
    }
}

/// Trait for migrations defined in Rust code.
pub trait MigrationUnit {
    /// Migration id; orders this migration among the others.
    const ID: &'static str;

    /// Returns the forwards actions.
    fn forwards() -> MigrationManager;

    /// Returns hand-written backwards actions, if any.
    fn backwards() -> Option<MigrationManager> {
        None
    }

    /// Converts to a [`Migration`] value.
    fn to_migration() -> Migration {
        Migration {
            id: Self::ID.to_string(),
            forwards: Self::forwards(),
            backwards: Self::backwards(),
        }
    }
}
