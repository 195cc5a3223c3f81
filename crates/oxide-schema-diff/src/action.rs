//! Recorded schema-change actions.
//!
//! An [`Action`] is one atomic change at table or column granularity. Actions
//! are created once by [`MigrationManager`](crate::manager::MigrationManager)
//! builder calls or by the differ, and are never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::schema::{Params, ParamValue, quote, render_params};

/// A single schema-change action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Add an empty table.
    AddTable {
        /// Class name of the new table.
        class_name: String,
        /// Physical table name.
        tablename: String,
    },

    /// Drop a table.
    DropTable {
        /// Class name of the table.
        class_name: String,
        /// Physical table name.
        tablename: String,
    },

    /// Re-key a table, keeping its columns.
    RenameTable {
        /// Class name before the rename.
        old_class_name: String,
        /// Class name after the rename.
        new_class_name: String,
        /// Physical table name after the rename.
        tablename: String,
    },

    /// Append a column to a table.
    AddColumn {
        /// Class name of the table.
        table_class_name: String,
        /// Physical table name.
        tablename: String,
        /// Column name.
        column_name: String,
        /// Column kind.
        column_class_name: String,
        /// Column attributes.
        #[serde(default)]
        params: Params,
    },

    /// Drop a column.
    DropColumn {
        /// Class name of the table.
        table_class_name: String,
        /// Physical table name.
        tablename: String,
        /// Column name.
        column_name: String,
    },

    /// Rename a column in place.
    RenameColumn {
        /// Class name of the table.
        table_class_name: String,
        /// Physical table name.
        tablename: String,
        /// Column name before the rename.
        old_column_name: String,
        /// Column name after the rename.
        new_column_name: String,
    },

    /// Overwrite some of a column's attributes.
    ///
    /// `params` is merged into the column, then `unset_params` are removed.
    /// `old_params` and `old_unset_params` record the same keys as they were
    /// before: a value, or absent.
    AlterColumn {
        /// Class name of the table.
        table_class_name: String,
        /// Physical table name.
        tablename: String,
        /// Column name.
        column_name: String,
        /// Attributes to overwrite.
        #[serde(default)]
        params: Params,
        /// Previous values of the overwritten attributes (for reversal).
        #[serde(default)]
        old_params: Params,
        /// Attributes to remove.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        unset_params: Vec<String>,
        /// Touched attributes the column did not have before.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        old_unset_params: Vec<String>,
        /// New column kind, if it changes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_class_name: Option<String>,
        /// Previous column kind, if it changes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_column_class_name: Option<String>,
    },
}

impl Action {
    /// Returns the inverse action.
    ///
    /// Returns `None` when the action doesn't record what it destroys.
    #[must_use]
    pub fn reverse(&self) -> Option<Self> {
        match self {
            Self::AddTable {
                class_name,
                tablename,
            } => Some(Self::DropTable {
                class_name: class_name.clone(),
                tablename: tablename.clone(),
            }),

            // The previous physical name isn't recorded
            Self::RenameTable { .. } => None,

            Self::DropTable { .. } | Self::DropColumn { .. } => None,

            Self::AddColumn {
                table_class_name,
                tablename,
                column_name,
                ..
            } => Some(Self::DropColumn {
                table_class_name: table_class_name.clone(),
                tablename: tablename.clone(),
                column_name: column_name.clone(),
            }),

            Self::RenameColumn {
                table_class_name,
                tablename,
                old_column_name,
                new_column_name,
            } => Some(Self::RenameColumn {
                table_class_name: table_class_name.clone(),
                tablename: tablename.clone(),
                old_column_name: new_column_name.clone(),
                new_column_name: old_column_name.clone(),
            }),

            Self::AlterColumn {
                table_class_name,
                tablename,
                column_name,
                params,
                old_params,
                unset_params,
                old_unset_params,
                column_class_name,
                old_column_class_name,
            } => {
                let recorded =
                    |k: &String| old_params.contains_key(k) || old_unset_params.contains(k);
                if !params.keys().chain(unset_params).all(recorded) {
                    return None;
                }
                if column_class_name.is_some() && old_column_class_name.is_none() {
                    return None;
                }
                Some(Self::AlterColumn {
                    table_class_name: table_class_name.clone(),
                    tablename: tablename.clone(),
                    column_name: column_name.clone(),
                    params: old_params.clone(),
                    old_params: params.clone(),
                    unset_params: old_unset_params.clone(),
                    old_unset_params: unset_params.clone(),
                    column_class_name: old_column_class_name.clone(),
                    old_column_class_name: column_class_name.clone(),
                })
            }
        }
    }

    /// Returns true if this action can be reversed.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.reverse().is_some()
    }

    /// Renders this action as a call on a `manager` identifier.
    ///
    /// Keyword names match the field names, in field order. The output is for
    /// display in migration files and does not carry every field:
    /// `rename_table` omits `new_class_name`, and an alter shows attributes the
    /// column did not have before as `None` in `old_params`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::AddTable {
                class_name,
                tablename,
            } => format!(
                "manager.add_table(class_name={}, tablename={})",
                quote(class_name),
                quote(tablename)
            ),
            Self::DropTable {
                class_name,
                tablename,
            } => format!(
                "manager.drop_table(class_name={}, tablename={})",
                quote(class_name),
                quote(tablename)
            ),
            Self::RenameTable {
                old_class_name,
                tablename,
                ..
            } => format!(
                "manager.rename_table(old_class_name={}, tablename={})",
                quote(old_class_name),
                quote(tablename)
            ),
            Self::AddColumn {
                table_class_name,
                tablename,
                column_name,
                column_class_name,
                params,
            } => format!(
                "manager.add_column(table_class_name={}, tablename={}, column_name={}, \
                 column_class_name={}, params={})",
                quote(table_class_name),
                quote(tablename),
                quote(column_name),
                quote(column_class_name),
                render_params(params)
            ),
            Self::DropColumn {
                table_class_name,
                tablename,
                column_name,
            } => format!(
                "manager.drop_column(table_class_name={}, tablename={}, column_name={})",
                quote(table_class_name),
                quote(tablename),
                quote(column_name)
            ),
            Self::RenameColumn {
                table_class_name,
                tablename,
                old_column_name,
                new_column_name,
            } => format!(
                "manager.rename_column(table_class_name={}, tablename={}, \
                 old_column_name={}, new_column_name={})",
                quote(table_class_name),
                quote(tablename),
                quote(old_column_name),
                quote(new_column_name)
            ),
            Self::AlterColumn {
                table_class_name,
                tablename,
                column_name,
                params,
                old_params,
                unset_params,
                old_unset_params,
                column_class_name,
                old_column_class_name,
            } => {
                let mut shown_old = old_params.clone();
                for key in old_unset_params {
                    shown_old.insert(key.clone(), ParamValue::Null);
                }
                let mut args = vec![
                    format!("table_class_name={}", quote(table_class_name)),
                    format!("tablename={}", quote(tablename)),
                    format!("column_name={}", quote(column_name)),
                    format!("params={}", render_params(params)),
                    format!("old_params={}", render_params(&shown_old)),
                ];
                if !unset_params.is_empty() {
                    let keys: Vec<String> = unset_params.iter().map(|k| quote(k)).collect();
                    args.push(format!("unset_params=[{}]", keys.join(", ")));
                }
                if let Some(class) = column_class_name {
                    args.push(format!("column_class_name={}", quote(class)));
                }
                if let Some(class) = old_column_class_name {
                    args.push(format!("old_column_class_name={}", quote(class)));
                }
                format!("manager.alter_column({})", args.join(", "))
            }
        }
    }

    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::AddTable { class_name, .. } => format!("Add table '{}'", class_name),
            Self::DropTable { class_name, .. } => format!("Drop table '{}'", class_name),
            Self::RenameTable {
                old_class_name,
                new_class_name,
                ..
            } => format!("Rename table '{}' to '{}'", old_class_name, new_class_name),
            Self::AddColumn {
                table_class_name,
                column_name,
                ..
            } => format!(
                "Add column '{}' to table '{}'",
                column_name, table_class_name
            ),
            Self::DropColumn {
                table_class_name,
                column_name,
                ..
            } => format!(
                "Drop column '{}' from table '{}'",
                column_name, table_class_name
            ),
            Self::RenameColumn {
                table_class_name,
                old_column_name,
                new_column_name,
                ..
            } => format!(
                "Rename column '{}' to '{}' in table '{}'",
                old_column_name, new_column_name, table_class_name
            ),
            Self::AlterColumn {
                table_class_name,
                column_name,
                ..
            } => format!(
                "Alter column '{}' in table '{}'",
                column_name, table_class_name
            ),
        }
    }
}

/// Old values for the keys of `changed`, taken from `current`, and the keys
/// `current` does not have.
#[must_use]
pub(crate) fn previous_values(changed: &Params, current: &Params) -> (Params, Vec<String>) {
    let mut old = Params::new();
    let mut missing = Vec::new();
    for key in changed.keys() {
        match current.get(key) {
            Some(value) => {
                old.insert(key.clone(), value.clone());
            }
            None => missing.push(key.clone()),
        }
    }
    (old, missing)
}
