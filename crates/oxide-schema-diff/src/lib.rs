//! Schema snapshot replay and rename-aware diffing for migrations.
//!
//! `oxide-schema-diff` reconstructs the schema a sequence of migrations has
//! produced, compares it against the live model definitions and emits the
//! ordered actions needed to bring the history up to date:
//! - Actions are recorded in per-migration managers and replayed in order
//! - Renames are detected structurally and confirmed through a decision source
//! - Generated actions render as manager calls ready for a migration file
//!
//! # Architecture
//!
//! - **Actions** - Recorded changes like `AddTable`, `RenameColumn`, `AlterColumn`
//! - **Manager** - An ordered action log for one migration
//! - **Snapshot** - Replays managers into a point-in-time schema
//! - **Differ** - Diffs the live schema against a snapshot
//! - **Decision** - Answers "was this renamed?" questions
//! - **Dialect** - Per-dialect rendering of read projections
//!
//! # Example
//!
//! ```rust
//! use oxide_schema_diff::prelude::*;
//!
//! let mut initial = MigrationManager::new();
//! initial
//!     .add_table("Band", "band")
//!     .add_column("Band", "band", "name", "Varchar", params([("length", 255)]));
//!
//! let snapshot = SchemaSnapshot::new([&initial]).get_snapshot().unwrap();
//!
//! let schema = vec![
//!     DiffableTable::new("Act", "act")
//!         .column(ColumnDescriptor::new("name", "Varchar").param("length", 255)),
//! ];
//!
//! let diff = SchemaDiffer::new(&schema, &snapshot).diff(&mut AutoInput::parse("y").unwrap());
//! assert_eq!(
//!     diff.render(),
//!     vec!["manager.rename_table(old_class_name='Band', tablename='act')"]
//! );
//! ```

pub mod action;
pub mod compare;
pub mod decision;
pub mod dialect;
pub mod differ;
pub mod error;
pub mod history;
pub mod manager;
pub mod migration;
pub mod schema;
pub mod snapshot;
pub mod state;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::compare::compare_dicts;
    pub use crate::decision::{
        AutoInput, Decision, DecisionSource, Interactive, NoDecision, RenameQuestion,
        RenameSubject,
    };
    pub use crate::dialect::{Dialect, Readable};
    pub use crate::differ::{DifferOptions, SchemaDiff, SchemaDiffer};
    pub use crate::error::{DiffError, Result};
    pub use crate::history::MigrationHistory;
    pub use crate::manager::MigrationManager;
    pub use crate::migration::{Migration, MigrationUnit, generate_migration_id};
    pub use crate::schema::{ColumnDescriptor, DiffableTable, ParamValue, Params, params};
    pub use crate::snapshot::SchemaSnapshot;
    pub use crate::state::SchemaState;
}
