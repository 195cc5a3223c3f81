//! Rename-aware schema differ.
//!
//! Compares the live schema against a replayed snapshot and produces the
//! actions that turn the snapshot into the live schema. Tables and columns
//! that disappeared on one side and appeared on the other with the same
//! structure are put to a [`DecisionSource`] as probable renames.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::action::{Action, previous_values};
use crate::compare::compare_dicts;
use crate::decision::{DecisionSource, RenameQuestion, RenameSubject};
use crate::manager::MigrationManager;
use crate::schema::{ColumnDescriptor, DiffableTable};

/// Options for the differ.
#[derive(Debug, Clone)]
pub struct DifferOptions {
    /// Whether to look for renamed tables.
    pub detect_table_renames: bool,
    /// Whether to look for renamed columns.
    pub detect_column_renames: bool,
}

impl Default for DifferOptions {
    fn default() -> Self {
        Self {
            detect_table_renames: true,
            detect_column_renames: true,
        }
    }
}

impl DifferOptions {
    /// Creates default options (all rename detection enabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables table rename detection.
    #[must_use]
    pub fn without_table_renames(mut self) -> Self {
        self.detect_table_renames = false;
        self
    }

    /// Disables column rename detection.
    #[must_use]
    pub fn without_column_renames(mut self) -> Self {
        self.detect_column_renames = false;
        self
    }
}

/// The actions produced by a diff, grouped in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDiff {
    /// Table renames (including physical-name-only changes).
    pub rename_tables: Vec<Action>,
    /// New tables, each followed by its columns.
    pub create_tables: Vec<Action>,
    /// Dropped tables.
    pub drop_tables: Vec<Action>,
    /// Column renames.
    pub rename_columns: Vec<Action>,
    /// New columns on existing tables.
    pub add_columns: Vec<Action>,
    /// Dropped columns on existing tables.
    pub drop_columns: Vec<Action>,
    /// Attribute changes on surviving columns.
    pub alter_columns: Vec<Action>,
}

impl SchemaDiff {
    /// Iterates every action in emission order.
    pub fn operations(&self) -> impl Iterator<Item = &Action> {
        self.rename_tables
            .iter()
            .chain(&self.create_tables)
            .chain(&self.drop_tables)
            .chain(&self.rename_columns)
            .chain(&self.add_columns)
            .chain(&self.drop_columns)
            .chain(&self.alter_columns)
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations().count()
    }

    /// Returns true if the schemas were structurally identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations().next().is_none()
    }

    /// Renders every action as a manager call, in emission order.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        self.operations().map(Action::render).collect()
    }

    /// Builds a manager holding every action, in emission order.
    #[must_use]
    pub fn into_manager(self) -> MigrationManager {
        let actions = [
            self.rename_tables,
            self.create_tables,
            self.drop_tables,
            self.rename_columns,
            self.add_columns,
            self.drop_columns,
            self.alter_columns,
        ]
        .into_iter()
        .flatten()
        .collect();
        MigrationManager::from_actions(actions)
    }
}

/// Diffs a live schema against a replayed snapshot.
#[derive(Debug, Clone)]
pub struct SchemaDiffer<'a> {
    schema: &'a [DiffableTable],
    schema_snapshot: &'a [DiffableTable],
    options: DifferOptions,
}

impl<'a> SchemaDiffer<'a> {
    /// Creates a differ with default options.
    #[must_use]
    pub fn new(schema: &'a [DiffableTable], schema_snapshot: &'a [DiffableTable]) -> Self {
        Self::with_options(schema, schema_snapshot, DifferOptions::default())
    }

    /// Creates a differ with custom options.
    #[must_use]
    pub fn with_options(
        schema: &'a [DiffableTable],
        schema_snapshot: &'a [DiffableTable],
        options: DifferOptions,
    ) -> Self {
        Self {
            schema,
            schema_snapshot,
            options,
        }
    }

    /// Computes the actions turning the snapshot into the live schema.
    ///
    /// Rename questions are asked one at a time, tables first, then
    /// columns table by table.
    pub fn diff(&self, decisions: &mut dyn DecisionSource) -> SchemaDiff {
        let mut diff = SchemaDiff::default();

        let snapshot_tables: HashMap<&str, &DiffableTable> = self
            .schema_snapshot
            .iter()
            .map(|t| (t.class_name.as_str(), t))
            .collect();
        let live_names: HashSet<&str> = self.schema.iter().map(|t| t.class_name.as_str()).collect();

        let creates: Vec<&DiffableTable> = self
            .schema
            .iter()
            .filter(|t| !snapshot_tables.contains_key(t.class_name.as_str()))
            .collect();
        let drops: Vec<&DiffableTable> = self
            .schema_snapshot
            .iter()
            .filter(|t| !live_names.contains(t.class_name.as_str()))
            .collect();

        let renamed = self.detect_table_renames(&creates, &drops, decisions);

        // (snapshot, live) pairs in live order
        let matched: Vec<(&DiffableTable, &DiffableTable)> = self
            .schema
            .iter()
            .filter_map(|live| {
                let name = live.class_name.as_str();
                snapshot_tables
                    .get(name)
                    .or_else(|| renamed.get(name))
                    .map(|old| (*old, live))
            })
            .collect();

        for (old, new) in &matched {
            if old.class_name != new.class_name || old.tablename != new.tablename {
                diff.rename_tables.push(Action::RenameTable {
                    old_class_name: old.class_name.clone(),
                    new_class_name: new.class_name.clone(),
                    tablename: new.tablename.clone(),
                });
            }
        }

        for table in &creates {
            if renamed.contains_key(table.class_name.as_str()) {
                continue;
            }
            diff.create_tables.push(Action::AddTable {
                class_name: table.class_name.clone(),
                tablename: table.tablename.clone(),
            });
            for column in &table.columns {
                diff.create_tables.push(add_column(table, column));
            }
        }

        let claimed: HashSet<&str> = renamed.values().map(|t| t.class_name.as_str()).collect();
        for table in &drops {
            if claimed.contains(table.class_name.as_str()) {
                continue;
            }
            diff.drop_tables.push(Action::DropTable {
                class_name: table.class_name.clone(),
                tablename: table.tablename.clone(),
            });
        }

        for (old, new) in &matched {
            self.diff_columns(old, new, decisions, &mut diff);
        }

        info!(
            renames = diff.rename_tables.len(),
            creates = diff.create_tables.len(),
            drops = diff.drop_tables.len(),
            total = diff.len(),
            "Schema diff computed"
        );

        diff
    }

    /// Maps live class names to the snapshot tables they replace.
    fn detect_table_renames(
        &self,
        creates: &[&'a DiffableTable],
        drops: &[&'a DiffableTable],
        decisions: &mut dyn DecisionSource,
    ) -> HashMap<&'a str, &'a DiffableTable> {
        let mut renamed = HashMap::new();
        if !self.options.detect_table_renames {
            return renamed;
        }

        let mut claimed: HashSet<&str> = HashSet::new();
        for &new in creates {
            // Empty tables all look alike
            if new.columns.is_empty() {
                continue;
            }
            let shape = new.column_shape();
            let candidates: Vec<&'a DiffableTable> = drops
                .iter()
                .copied()
                .filter(|old| {
                    !claimed.contains(old.class_name.as_str())
                        && !old.columns.is_empty()
                        && old.column_shape() == shape
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }

            // Other new tables the same candidates would fit
            let rivals: Vec<String> = creates
                .iter()
                .filter(|other| {
                    other.class_name != new.class_name
                        && !renamed.contains_key(other.class_name.as_str())
                        && !other.columns.is_empty()
                        && other.column_shape() == shape
                })
                .map(|other| other.class_name.clone())
                .collect();

            let question = RenameQuestion {
                subject: RenameSubject::Table,
                new_name: new.class_name.clone(),
                candidates: candidates.iter().map(|t| t.class_name.clone()).collect(),
                rivals,
            };
            let decision = decisions.decide(&question);
            debug!(table = %new.class_name, ?decision, candidates = ?question.candidates, "Table rename question");

            if let Some(idx) = question.resolve(decision) {
                let old = candidates[idx];
                claimed.insert(old.class_name.as_str());
                renamed.insert(new.class_name.as_str(), old);
            }
        }

        renamed
    }

    /// Diffs the columns of a snapshot table against its live counterpart.
    fn diff_columns(
        &self,
        old: &DiffableTable,
        new: &DiffableTable,
        decisions: &mut dyn DecisionSource,
        diff: &mut SchemaDiff,
    ) {
        let added: Vec<&ColumnDescriptor> = new
            .columns
            .iter()
            .filter(|c| old.get_column(&c.name).is_none())
            .collect();
        let dropped: Vec<&ColumnDescriptor> = old
            .columns
            .iter()
            .filter(|c| new.get_column(&c.name).is_none())
            .collect();

        let renamed = self.detect_column_renames(new, &added, &dropped, decisions);
        let claimed: HashSet<&str> = renamed.values().map(|c| c.name.as_str()).collect();

        for column in &added {
            if let Some(old_column) = renamed.get(column.name.as_str()) {
                diff.rename_columns.push(Action::RenameColumn {
                    table_class_name: new.class_name.clone(),
                    tablename: new.tablename.clone(),
                    old_column_name: old_column.name.clone(),
                    new_column_name: column.name.clone(),
                });
            }
        }

        for column in &added {
            if !renamed.contains_key(column.name.as_str()) {
                diff.add_columns.push(add_column(new, column));
            }
        }

        for column in &dropped {
            if !claimed.contains(column.name.as_str()) {
                diff.drop_columns.push(Action::DropColumn {
                    table_class_name: new.class_name.clone(),
                    tablename: new.tablename.clone(),
                    column_name: column.name.clone(),
                });
            }
        }

        for column in &new.columns {
            let counterpart = old
                .get_column(&column.name)
                .or_else(|| renamed.get(column.name.as_str()).copied());
            if let Some(old_column) = counterpart {
                if let Some(action) = alter_column(new, old_column, column) {
                    diff.alter_columns.push(action);
                }
            }
        }
    }

    /// Maps added column names to the dropped columns they replace.
    ///
    /// Candidates share the added column's type. When several do, the ones
    /// whose attributes also match are preferred. The same preference applies
    /// to other added columns competing for a single candidate.
    fn detect_column_renames<'c>(
        &self,
        table: &DiffableTable,
        added: &[&'c ColumnDescriptor],
        dropped: &[&'c ColumnDescriptor],
        decisions: &mut dyn DecisionSource,
    ) -> HashMap<&'c str, &'c ColumnDescriptor> {
        let mut renamed = HashMap::new();
        if !self.options.detect_column_renames {
            return renamed;
        }

        let mut claimed: HashSet<&str> = HashSet::new();
        for &new in added {
            let mut candidates: Vec<&'c ColumnDescriptor> = dropped
                .iter()
                .copied()
                .filter(|old| !claimed.contains(old.name.as_str()) && old.type_name == new.type_name)
                .collect();
            if candidates.len() > 1 {
                let exact: Vec<&'c ColumnDescriptor> = candidates
                    .iter()
                    .copied()
                    .filter(|old| old.params == new.params)
                    .collect();
                if exact.len() == 1 {
                    candidates = exact;
                }
            }
            if candidates.is_empty() {
                continue;
            }

            let mut rivals: Vec<&'c ColumnDescriptor> = added
                .iter()
                .copied()
                .filter(|other| {
                    other.name != new.name
                        && !renamed.contains_key(other.name.as_str())
                        && other.type_name == new.type_name
                })
                .collect();
            // An exact match beats rivals that only share the type
            if let [single] = candidates.as_slice() {
                if new.params == single.params && rivals.iter().all(|r| r.params != single.params) {
                    rivals.clear();
                }
            }

            let question = RenameQuestion {
                subject: RenameSubject::Column {
                    table_class_name: table.class_name.clone(),
                },
                new_name: new.name.clone(),
                candidates: candidates.iter().map(|c| c.name.clone()).collect(),
                rivals: rivals.iter().map(|c| c.name.clone()).collect(),
            };
            let decision = decisions.decide(&question);
            debug!(table = %table.class_name, column = %new.name, ?decision, "Column rename question");

            if let Some(idx) = question.resolve(decision) {
                let old = candidates[idx];
                claimed.insert(old.name.as_str());
                renamed.insert(new.name.as_str(), old);
            }
        }

        renamed
    }
}

fn add_column(table: &DiffableTable, column: &ColumnDescriptor) -> Action {
    Action::AddColumn {
        table_class_name: table.class_name.clone(),
        tablename: table.tablename.clone(),
        column_name: column.name.clone(),
        column_class_name: column.type_name.clone(),
        params: column.params.clone(),
    }
}

/// Alteration taking `old` to `new`, carrying only the changed attributes.
fn alter_column(
    table: &DiffableTable,
    old: &ColumnDescriptor,
    new: &ColumnDescriptor,
) -> Option<Action> {
    let params = compare_dicts(&new.params, &old.params);
    let type_changed = new.type_name != old.type_name;
    if params.is_empty() && !type_changed {
        return None;
    }

    let (old_params, old_unset_params) = previous_values(&params, &old.params);
    Some(Action::AlterColumn {
        table_class_name: table.class_name.clone(),
        tablename: table.tablename.clone(),
        column_name: new.name.clone(),
        params,
        old_params,
        unset_params: Vec::new(),
        old_unset_params,
        column_class_name: type_changed.then(|| new.type_name.clone()),
        old_column_class_name: type_changed.then(|| old.type_name.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{AutoInput, Decision, NoDecision};
    use crate::schema::{ParamValue, params};

    fn name_column() -> ColumnDescriptor {
        ColumnDescriptor::new("name", "Varchar").param("length", 255)
    }

    fn yes() -> AutoInput {
        AutoInput::new(Decision::Rename)
    }

    #[test]
    fn test_rename_table() {
        let schema = vec![DiffableTable::new("Act", "act").column(name_column())];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut AutoInput::parse("y").unwrap());

        assert_eq!(diff.rename_tables.len(), 1);
        assert_eq!(
            diff.rename_tables[0].render(),
            "manager.rename_table(old_class_name='Band', tablename='act')"
        );
        assert!(diff.create_tables.is_empty());
        assert!(diff.drop_tables.is_empty());
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn test_declined_rename_is_create_and_drop() {
        let schema = vec![DiffableTable::new("Act", "act").column(name_column())];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut NoDecision);

        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.create_tables.len(), 2);
        assert!(matches!(diff.create_tables[0], Action::AddTable { .. }));
        assert!(matches!(diff.create_tables[1], Action::AddColumn { .. }));
        assert_eq!(diff.drop_tables.len(), 1);
    }

    #[test]
    fn test_identical_schemas_yield_nothing() {
        let schema = vec![
            DiffableTable::new("Band", "band").column(name_column()),
            DiffableTable::new("Manager", "manager"),
        ];

        let diff = SchemaDiffer::new(&schema, &schema.clone()).diff(&mut yes());
        assert!(diff.is_empty());
    }

    #[test]
    fn test_no_question_without_shape_match() {
        let schema = vec![
            DiffableTable::new("Act", "act").column(ColumnDescriptor::new("title", "Varchar")),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let mut asked = 0;
        let mut source = |_: &RenameQuestion| {
            asked += 1;
            Decision::Rename
        };
        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut source);

        assert_eq!(asked, 0);
        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.drop_tables.len(), 1);
    }

    #[test]
    fn test_empty_tables_never_rename_candidates() {
        let schema = vec![DiffableTable::new("Act", "act")];
        let schema_snapshot = vec![DiffableTable::new("Band", "band")];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.create_tables.len(), 1);
        assert_eq!(diff.drop_tables.len(), 1);
    }

    #[test]
    fn test_ambiguous_rename_not_auto_resolved() {
        let schema = vec![DiffableTable::new("Act", "act").column(name_column())];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(name_column()),
            DiffableTable::new("Group", "group").column(name_column()),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.drop_tables.len(), 2);
    }

    #[test]
    fn test_ambiguous_rename_selected() {
        let schema = vec![DiffableTable::new("Act", "act").column(name_column())];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(name_column()),
            DiffableTable::new("Group", "group").column(name_column()),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot)
            .diff(&mut AutoInput::new(Decision::Select(1)));

        assert_eq!(
            diff.rename_tables,
            vec![Action::RenameTable {
                old_class_name: "Group".to_string(),
                new_class_name: "Act".to_string(),
                tablename: "act".to_string(),
            }]
        );
        assert_eq!(
            diff.drop_tables,
            vec![Action::DropTable {
                class_name: "Band".to_string(),
                tablename: "band".to_string(),
            }]
        );
    }

    #[test]
    fn test_contested_drop_not_auto_resolved() {
        let schema = vec![
            DiffableTable::new("Act", "act").column(name_column()),
            DiffableTable::new("Group", "group").column(name_column()),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let mut questions = Vec::new();
        let mut source = |q: &RenameQuestion| {
            questions.push((q.new_name.clone(), q.rivals.clone()));
            Decision::Rename
        };
        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut source);

        assert_eq!(
            questions,
            vec![
                ("Act".to_string(), vec!["Group".to_string()]),
                ("Group".to_string(), vec!["Act".to_string()]),
            ]
        );
        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.drop_tables.len(), 1);
        assert_eq!(
            diff.create_tables
                .iter()
                .filter(|a| matches!(a, Action::AddTable { .. }))
                .count(),
            2
        );

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut AutoInput::parse("y").unwrap());
        assert!(diff.rename_tables.is_empty());
    }

    #[test]
    fn test_contested_drop_selected() {
        let schema = vec![
            DiffableTable::new("Act", "act").column(name_column()),
            DiffableTable::new("Group", "group").column(name_column()),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot)
            .diff(&mut AutoInput::new(Decision::Select(0)));

        assert_eq!(
            diff.render()[..2],
            [
                "manager.rename_table(old_class_name='Band', tablename='act')".to_string(),
                "manager.add_table(class_name='Group', tablename='group')".to_string(),
            ]
        );
        assert!(diff.drop_tables.is_empty());
    }

    #[test]
    fn test_contested_column_not_auto_resolved() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("title", "Varchar").param("length", 255))
                .column(ColumnDescriptor::new("label", "Varchar").param("length", 255)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert!(diff.rename_columns.is_empty());
        assert_eq!(diff.add_columns.len(), 2);
        assert_eq!(diff.drop_columns.len(), 1);
    }

    #[test]
    fn test_exact_column_match_beats_rival() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("label", "Varchar").param("length", 50))
                .column(ColumnDescriptor::new("title", "Varchar").param("length", 255)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(
            diff.rename_columns[0].render(),
            "manager.rename_column(table_class_name='Band', tablename='band', \
             old_column_name='name', new_column_name='title')"
        );
        assert_eq!(diff.add_columns.len(), 1);
        assert!(diff.drop_columns.is_empty());
    }

    #[test]
    fn test_alter_records_attributes_absent_before() {
        let schema = vec![
            DiffableTable::new("Band", "band").column(name_column().param("unique", true)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        match &diff.alter_columns[..] {
            [Action::AlterColumn {
                params: p,
                old_params,
                old_unset_params,
                ..
            }] => {
                assert_eq!(p, &params([("unique", true)]));
                assert!(old_params.is_empty());
                assert_eq!(old_unset_params, &vec!["unique".to_string()]);
            }
            other => panic!("Expected one AlterColumn, got {:?}", other),
        }
        assert_eq!(
            diff.render(),
            vec![
                "manager.alter_column(table_class_name='Band', tablename='band', \
                 column_name='name', params={'unique': True}, old_params={'unique': None})"
            ]
        );
    }

    #[test]
    fn test_tablename_change_is_rename() {
        let schema = vec![DiffableTable::new("Band", "bands").column(name_column())];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut NoDecision);

        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.rename_tables[0].render(),
            "manager.rename_table(old_class_name='Band', tablename='bands')"
        );
    }

    #[test]
    fn test_renames_precede_creates_and_drops() {
        let schema = vec![
            DiffableTable::new("Venue", "venue").column(ColumnDescriptor::new("city", "Varchar")),
            DiffableTable::new("Act", "act").column(name_column()),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(name_column()),
            DiffableTable::new("Ticket", "ticket").column(ColumnDescriptor::new("price", "Numeric")),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());
        let ops: Vec<&Action> = diff.operations().collect();

        let last_rename = ops
            .iter()
            .rposition(|a| matches!(a, Action::RenameTable { .. }))
            .unwrap();
        let first_other = ops
            .iter()
            .position(|a| matches!(a, Action::AddTable { .. } | Action::DropTable { .. }))
            .unwrap();
        assert!(last_rename < first_other);
    }

    #[test]
    fn test_add_and_drop_columns() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(name_column())
                .column(ColumnDescriptor::new("popularity", "Integer").param("default", 0)),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band")
                .column(name_column())
                .column(ColumnDescriptor::new("founded", "Date")),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(
            diff.render(),
            vec![
                "manager.add_column(table_class_name='Band', tablename='band', \
                 column_name='popularity', column_class_name='Integer', params={'default': 0})",
                "manager.drop_column(table_class_name='Band', tablename='band', \
                 column_name='founded')",
            ]
        );
    }

    #[test]
    fn test_rename_column() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("title", "Varchar").param("length", 255)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.rename_columns[0].render(),
            "manager.rename_column(table_class_name='Band', tablename='band', \
             old_column_name='name', new_column_name='title')"
        );
    }

    #[test]
    fn test_renamed_column_with_changed_params_also_altered() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("title", "Varchar").param("length", 100)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(diff.rename_columns.len(), 1);
        assert_eq!(diff.alter_columns.len(), 1);
        match &diff.alter_columns[0] {
            Action::AlterColumn {
                column_name,
                params: p,
                old_params,
                ..
            } => {
                assert_eq!(column_name, "title");
                assert_eq!(p, &params([("length", 100)]));
                assert_eq!(old_params, &params([("length", 255)]));
            }
            other => panic!("Expected AlterColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_column_rename_prefers_matching_params() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("label", "Varchar").param("length", 50)),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("name", "Varchar").param("length", 255))
                .column(ColumnDescriptor::new("genre", "Varchar").param("length", 50)),
        ];

        let mut questions = Vec::new();
        let mut source = |q: &RenameQuestion| {
            questions.push(q.candidates.clone());
            Decision::Rename
        };
        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut source);

        assert_eq!(questions, vec![vec!["genre".to_string()]]);
        assert_eq!(diff.rename_columns.len(), 1);
        assert_eq!(diff.drop_columns.len(), 1);
        assert!(diff.alter_columns.is_empty());
    }

    #[test]
    fn test_column_rename_stays_ambiguous_without_param_match() {
        let schema = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("label", "Varchar").param("length", 10)),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band")
                .column(ColumnDescriptor::new("name", "Varchar").param("length", 255))
                .column(ColumnDescriptor::new("genre", "Varchar").param("length", 50)),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert!(diff.rename_columns.is_empty());
        assert_eq!(diff.add_columns.len(), 1);
        assert_eq!(diff.drop_columns.len(), 2);
    }

    #[test]
    fn test_alter_carries_only_changed_keys() {
        let schema = vec![
            DiffableTable::new("Band", "band").column(
                ColumnDescriptor::new("name", "Varchar")
                    .param("length", 255)
                    .param("unique", true),
            ),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(
                ColumnDescriptor::new("name", "Varchar")
                    .param("length", 255)
                    .param("unique", false),
            ),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(
            diff.render(),
            vec![
                "manager.alter_column(table_class_name='Band', tablename='band', \
                 column_name='name', params={'unique': True}, old_params={'unique': False})"
            ]
        );
        assert!(diff.alter_columns[0].is_reversible());
    }

    #[test]
    fn test_alter_column_type() {
        let schema = vec![
            DiffableTable::new("Band", "band").column(ColumnDescriptor::new("popularity", "BigInt")),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(ColumnDescriptor::new("popularity", "Integer")),
        ];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        match &diff.alter_columns[..] {
            [Action::AlterColumn {
                column_class_name,
                old_column_class_name,
                ..
            }] => {
                assert_eq!(column_class_name.as_deref(), Some("BigInt"));
                assert_eq!(old_column_class_name.as_deref(), Some("Integer"));
            }
            other => panic!("Expected one AlterColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_renamed_table_columns_diffed() {
        let schema = vec![
            DiffableTable::new("Act", "act")
                .column(ColumnDescriptor::new("name", "Varchar").param("length", 100)),
        ];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let diff = SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut yes());

        assert_eq!(diff.rename_tables.len(), 1);
        match &diff.alter_columns[..] {
            [Action::AlterColumn {
                table_class_name,
                params: p,
                ..
            }] => {
                assert_eq!(table_class_name, "Act");
                assert_eq!(p["length"], ParamValue::Integer(100));
            }
            other => panic!("Expected one AlterColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_rename_detection_disabled() {
        let schema = vec![DiffableTable::new("Act", "act").column(name_column())];
        let schema_snapshot = vec![DiffableTable::new("Band", "band").column(name_column())];

        let options = DifferOptions::new().without_table_renames();
        let diff = SchemaDiffer::with_options(&schema, &schema_snapshot, options).diff(&mut yes());

        assert!(diff.rename_tables.is_empty());
        assert_eq!(diff.drop_tables.len(), 1);
    }

    #[test]
    fn test_tables_asked_before_columns() {
        let schema = vec![
            DiffableTable::new("Band", "band").column(ColumnDescriptor::new("title", "Varchar")),
            DiffableTable::new("Act", "act").column(ColumnDescriptor::new("city", "Varchar")),
        ];
        let schema_snapshot = vec![
            DiffableTable::new("Band", "band").column(ColumnDescriptor::new("name", "Varchar")),
            DiffableTable::new("Venue", "venue").column(ColumnDescriptor::new("city", "Varchar")),
        ];

        let mut subjects = Vec::new();
        let mut source = |q: &RenameQuestion| {
            subjects.push(q.subject.clone());
            Decision::Rename
        };
        SchemaDiffer::new(&schema, &schema_snapshot).diff(&mut source);

        assert_eq!(
            subjects,
            vec![
                RenameSubject::Table,
                RenameSubject::Column {
                    table_class_name: "Band".to_string()
                },
            ]
        );
    }
}
