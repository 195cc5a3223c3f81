//! Error types for snapshot replay and diffing.

use std::path::PathBuf;

/// Errors that can occur while replaying or diffing schemas.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A table was added twice without an intervening drop.
    #[error("Table '{class_name}' already exists")]
    DuplicateTable {
        /// Class name of the table.
        class_name: String,
    },

    /// An action referenced a table that isn't in the state.
    #[error("Table '{class_name}' does not exist")]
    TableNotFound {
        /// Class name of the missing table.
        class_name: String,
    },

    /// A column was added twice to the same table.
    #[error("Column '{column}' already exists in table '{table}'")]
    DuplicateColumn {
        /// Class name of the table.
        table: String,
        /// Column name.
        column: String,
    },

    /// An action referenced a column that isn't in its table.
    #[error("Column '{column}' does not exist in table '{table}'")]
    ColumnNotFound {
        /// Class name of the table.
        table: String,
        /// Column name.
        column: String,
    },

    /// An action can't be reversed from the information it carries.
    #[error("Action is not reversible: {0}")]
    NotReversible(String),

    /// A render was requested for a dialect with no mapping.
    #[error("Unrecognised dialect - received {0}")]
    UnrecognizedDialect(String),

    /// A decision answer couldn't be parsed.
    #[error("Invalid decision '{0}', expected y, n or a candidate number")]
    InvalidDecision(String),

    /// Two migrations share the same id.
    #[error("Duplicate migration id: {0}")]
    DuplicateMigration(String),

    /// Migration not found in the history.
    #[error("Migration not found: {0}")]
    MigrationNotFound(String),

    /// IO error (reading history files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read a history file.
    #[error("Failed to parse history file '{path}': {message}")]
    ParseError {
        /// Path to the history file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for replay and diff operations.
pub type Result<T> = std::result::Result<T, DiffError>;
