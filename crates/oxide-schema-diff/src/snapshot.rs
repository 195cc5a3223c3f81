//! Point-in-time schema snapshots.
//!
//! Replays a chronologically ordered sequence of managers (oldest first)
//! into a fresh [`SchemaState`].

use tracing::debug;

use crate::error::Result;
use crate::manager::MigrationManager;
use crate::schema::DiffableTable;
use crate::state::SchemaState;

/// Builds the schema as of the end of a sequence of managers.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot<'a> {
    managers: Vec<&'a MigrationManager>,
}

impl<'a> SchemaSnapshot<'a> {
    /// Creates a snapshot builder. Manager order is authoritative.
    #[must_use]
    pub fn new(managers: impl IntoIterator<Item = &'a MigrationManager>) -> Self {
        Self {
            managers: managers.into_iter().collect(),
        }
    }

    /// Replays every manager into a new state.
    pub fn get_state(&self) -> Result<SchemaState> {
        let mut state = SchemaState::new();
        for (idx, manager) in self.managers.iter().enumerate() {
            debug!(
                manager = idx,
                actions = manager.actions().len(),
                "Replaying manager"
            );
            manager.apply(&mut state)?;
        }
        Ok(state)
    }

    /// Replays every manager and returns the resulting tables, ordered by
    /// first insertion.
    pub fn get_snapshot(&self) -> Result<Vec<DiffableTable>> {
        Ok(self.get_state()?.into_tables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiffError;
    use crate::schema::{ParamValue, params};

    fn class_names(snapshot: &[DiffableTable]) -> Vec<&str> {
        snapshot.iter().map(|t| t.class_name.as_str()).collect()
    }

    #[test]
    fn test_snapshot_add() {
        let mut manager_1 = MigrationManager::new();
        manager_1.add_table("Manager", "manager");

        let mut manager_2 = MigrationManager::new();
        manager_2.add_table("Band", "band");

        let snapshot = SchemaSnapshot::new([&manager_1, &manager_2])
            .get_snapshot()
            .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(class_names(&snapshot), vec!["Manager", "Band"]);
    }

    #[test]
    fn test_snapshot_remove() {
        let mut manager_1 = MigrationManager::new();
        manager_1
            .add_table("Manager", "manager")
            .add_table("Band", "band");

        let mut manager_2 = MigrationManager::new();
        manager_2.drop_table("Band", "band");

        let snapshot = SchemaSnapshot::new([&manager_1, &manager_2])
            .get_snapshot()
            .unwrap();

        assert_eq!(class_names(&snapshot), vec!["Manager"]);
    }

    #[test]
    fn test_add_columns() {
        let mut manager_1 = MigrationManager::new();
        manager_1.add_table("Manager", "manager").add_column(
            "Manager",
            "manager",
            "name",
            "Varchar",
            params([("length", 100)]),
        );

        let snapshot = SchemaSnapshot::new([&manager_1]).get_snapshot().unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].columns.len(), 1);
    }

    #[test]
    fn test_alter_columns() {
        let mut manager_1 = MigrationManager::new();
        manager_1.add_table("Manager", "manager").add_column(
            "Manager",
            "manager",
            "name",
            "Varchar",
            params([("length", 100)]),
        );

        let mut manager_2 = MigrationManager::new();
        manager_2.alter_column("Manager", "manager", "name", params([("unique", true)]));

        let snapshot = SchemaSnapshot::new([&manager_1, &manager_2])
            .get_snapshot()
            .unwrap();

        let column = &snapshot[0].columns[0];
        assert_eq!(column.params["unique"], ParamValue::Bool(true));
        assert_eq!(column.params["length"], ParamValue::Integer(100));
    }

    #[test]
    fn test_empty_input() {
        let snapshot = SchemaSnapshot::new(std::iter::empty()).get_snapshot().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_calls_are_independent() {
        let mut manager_1 = MigrationManager::new();
        manager_1.add_table("Band", "band");

        let builder = SchemaSnapshot::new([&manager_1]);
        let first = builder.get_snapshot().unwrap();
        let second = builder.get_snapshot().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_follows_first_insertion() {
        let mut manager_1 = MigrationManager::new();
        manager_1
            .add_table("Band", "band")
            .add_table("Manager", "manager");

        let mut manager_2 = MigrationManager::new();
        manager_2.add_column("Band", "band", "name", "Varchar", params([("length", 50)]));

        let snapshot = SchemaSnapshot::new([&manager_1, &manager_2])
            .get_snapshot()
            .unwrap();
        assert_eq!(class_names(&snapshot), vec!["Band", "Manager"]);
    }

    #[test]
    fn test_corrupt_history_is_fatal() {
        let mut manager_1 = MigrationManager::new();
        manager_1.add_table("Band", "band");

        let mut manager_2 = MigrationManager::new();
        manager_2.add_table("Band", "band");

        let result = SchemaSnapshot::new([&manager_1, &manager_2]).get_snapshot();
        assert!(matches!(result, Err(DiffError::DuplicateTable { .. })));
    }
}
