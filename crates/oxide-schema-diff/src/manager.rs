//! Migration managers.
//!
//! A [`MigrationManager`] accumulates the ordered actions of one migration
//! unit. Builder calls only append; nothing is checked until the log is
//! replayed with [`MigrationManager::apply`].

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{DiffError, Result};
use crate::schema::Params;
use crate::state::SchemaState;

/// An ordered log of schema-change actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationManager {
    actions: Vec<Action>,
}

impl MigrationManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager from existing actions.
    #[must_use]
    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Returns the recorded actions in append order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Appends a fully formed action.
    pub fn push(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }

    /// Records adding a table.
    pub fn add_table(
        &mut self,
        class_name: impl Into<String>,
        tablename: impl Into<String>,
    ) -> &mut Self {
        self.push(Action::AddTable {
            class_name: class_name.into(),
            tablename: tablename.into(),
        })
    }

    /// Records dropping a table.
    pub fn drop_table(
        &mut self,
        class_name: impl Into<String>,
        tablename: impl Into<String>,
    ) -> &mut Self {
        self.push(Action::DropTable {
            class_name: class_name.into(),
            tablename: tablename.into(),
        })
    }

    /// Records renaming a table.
    pub fn rename_table(
        &mut self,
        old_class_name: impl Into<String>,
        new_class_name: impl Into<String>,
        tablename: impl Into<String>,
    ) -> &mut Self {
        self.push(Action::RenameTable {
            old_class_name: old_class_name.into(),
            new_class_name: new_class_name.into(),
            tablename: tablename.into(),
        })
    }

    /// Records adding a column.
    pub fn add_column(
        &mut self,
        table_class_name: impl Into<String>,
        tablename: impl Into<String>,
        column_name: impl Into<String>,
        column_class_name: impl Into<String>,
        params: Params,
    ) -> &mut Self {
        self.push(Action::AddColumn {
            table_class_name: table_class_name.into(),
            tablename: tablename.into(),
            column_name: column_name.into(),
            column_class_name: column_class_name.into(),
            params,
        })
    }

    /// Records dropping a column.
    pub fn drop_column(
        &mut self,
        table_class_name: impl Into<String>,
        tablename: impl Into<String>,
        column_name: impl Into<String>,
    ) -> &mut Self {
        self.push(Action::DropColumn {
            table_class_name: table_class_name.into(),
            tablename: tablename.into(),
            column_name: column_name.into(),
        })
    }

    /// Records renaming a column.
    pub fn rename_column(
        &mut self,
        table_class_name: impl Into<String>,
        tablename: impl Into<String>,
        old_column_name: impl Into<String>,
        new_column_name: impl Into<String>,
    ) -> &mut Self {
        self.push(Action::RenameColumn {
            table_class_name: table_class_name.into(),
            tablename: tablename.into(),
            old_column_name: old_column_name.into(),
            new_column_name: new_column_name.into(),
        })
    }

    /// Records overwriting some of a column's attributes.
    ///
    /// The previous values aren't known here, so the action isn't
    /// reversible. Use [`push`](Self::push) with `old_params` filled in
    /// when they are.
    pub fn alter_column(
        &mut self,
        table_class_name: impl Into<String>,
        tablename: impl Into<String>,
        column_name: impl Into<String>,
        params: Params,
    ) -> &mut Self {
        self.push(Action::AlterColumn {
            table_class_name: table_class_name.into(),
            tablename: tablename.into(),
            column_name: column_name.into(),
            params,
            old_params: Params::new(),
            unset_params: Vec::new(),
            old_unset_params: Vec::new(),
            column_class_name: None,
            old_column_class_name: None,
        })
    }

    /// Replays every action, in append order, against `state`.
    pub fn apply(&self, state: &mut SchemaState) -> Result<()> {
        state.apply_actions(&self.actions)
    }

    /// Returns true if every action can be reversed.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.actions.iter().all(Action::is_reversible)
    }

    /// Builds the backwards manager: reversed actions in reverse order.
    pub fn reversed(&self) -> Result<Self> {
        let actions = self
            .actions
            .iter()
            .rev()
            .map(|action| {
                action
                    .reverse()
                    .ok_or_else(|| DiffError::NotReversible(action.description()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { actions })
    }

    /// Renders every action as a manager call.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        self.actions.iter().map(Action::render).collect()
    }
}
