//! State reconstruction from recorded actions.
//!
//! A [`SchemaState`] is built empty and mutated by replaying actions in log
//! order. Each snapshot computation owns its state; nothing is shared between
//! computations.

use tracing::debug;

use crate::action::Action;
use crate::error::{DiffError, Result};
use crate::schema::{ColumnDescriptor, DiffableTable};

/// Tables keyed by `class_name`, ordered by first insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaState {
    tables: Vec<DiffableTable>,
}

impl SchemaState {
    /// Creates a new empty schema state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tables in insertion order.
    #[must_use]
    pub fn tables(&self) -> &[DiffableTable] {
        &self.tables
    }

    /// Consumes and returns the tables.
    #[must_use]
    pub fn into_tables(self) -> Vec<DiffableTable> {
        self.tables
    }

    /// Gets a table by class name.
    #[must_use]
    pub fn get_table(&self, class_name: &str) -> Option<&DiffableTable> {
        self.tables.iter().find(|t| t.class_name == class_name)
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if there are no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn position(&self, class_name: &str) -> Result<usize> {
        self.tables
            .iter()
            .position(|t| t.class_name == class_name)
            .ok_or_else(|| DiffError::TableNotFound {
                class_name: class_name.to_string(),
            })
    }

    fn table_mut(&mut self, class_name: &str) -> Result<&mut DiffableTable> {
        let idx = self.position(class_name)?;
        Ok(&mut self.tables[idx])
    }

    /// Applies a single action to the state.
    pub fn apply_action(&mut self, action: &Action) -> Result<()> {
        debug!(action = %action.description(), "Replaying action");

        match action {
            Action::AddTable {
                class_name,
                tablename,
            } => {
                if self.get_table(class_name).is_some() {
                    return Err(DiffError::DuplicateTable {
                        class_name: class_name.clone(),
                    });
                }
                self.tables
                    .push(DiffableTable::new(class_name.clone(), tablename.clone()));
            }

            Action::DropTable { class_name, .. } => {
                let idx = self.position(class_name)?;
                self.tables.remove(idx);
            }

            Action::RenameTable {
                old_class_name,
                new_class_name,
                tablename,
            } => {
                let idx = self.position(old_class_name)?;
                if old_class_name != new_class_name && self.get_table(new_class_name).is_some() {
                    return Err(DiffError::DuplicateTable {
                        class_name: new_class_name.clone(),
                    });
                }
                // Replace the entry wholesale, keeping its slot
                let columns = std::mem::take(&mut self.tables[idx].columns);
                self.tables[idx] = DiffableTable {
                    class_name: new_class_name.clone(),
                    tablename: tablename.clone(),
                    columns,
                };
            }

            Action::AddColumn {
                table_class_name,
                column_name,
                column_class_name,
                params,
                ..
            } => {
                let table = self.table_mut(table_class_name)?;
                if table.get_column(column_name).is_some() {
                    return Err(DiffError::DuplicateColumn {
                        table: table_class_name.clone(),
                        column: column_name.clone(),
                    });
                }
                table.columns.push(
                    ColumnDescriptor::new(column_name.clone(), column_class_name.clone())
                        .with_params(params.clone()),
                );
            }

            Action::DropColumn {
                table_class_name,
                column_name,
                ..
            } => {
                let table = self.table_mut(table_class_name)?;
                let idx = table
                    .columns
                    .iter()
                    .position(|c| c.name == *column_name)
                    .ok_or_else(|| DiffError::ColumnNotFound {
                        table: table_class_name.clone(),
                        column: column_name.clone(),
                    })?;
                table.columns.remove(idx);
            }

            Action::RenameColumn {
                table_class_name,
                old_column_name,
                new_column_name,
                ..
            } => {
                let table = self.table_mut(table_class_name)?;
                if old_column_name != new_column_name
                    && table.get_column(new_column_name).is_some()
                {
                    return Err(DiffError::DuplicateColumn {
                        table: table_class_name.clone(),
                        column: new_column_name.clone(),
                    });
                }
                let column =
                    table
                        .get_column_mut(old_column_name)
                        .ok_or_else(|| DiffError::ColumnNotFound {
                            table: table_class_name.clone(),
                            column: old_column_name.clone(),
                        })?;
                column.name = new_column_name.clone();
            }

            Action::AlterColumn {
                table_class_name,
                column_name,
                params,
                unset_params,
                column_class_name,
                ..
            } => {
                let table = self.table_mut(table_class_name)?;
                let column =
                    table
                        .get_column_mut(column_name)
                        .ok_or_else(|| DiffError::ColumnNotFound {
                            table: table_class_name.clone(),
                            column: column_name.clone(),
                        })?;
                let mut merged = column.params.clone();
                merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
                for key in unset_params {
                    merged.remove(key);
                }
                let type_name = column_class_name
                    .clone()
                    .unwrap_or_else(|| column.type_name.clone());
                *column = ColumnDescriptor::new(column_name.clone(), type_name).with_params(merged);
            }
        }

        Ok(())
    }

    /// Applies several actions in order.
    pub fn apply_actions<'a>(&mut self, actions: impl IntoIterator<Item = &'a Action>) -> Result<()> {
        for action in actions {
            self.apply_action(action)?;
        }
        Ok(())
    }
}
