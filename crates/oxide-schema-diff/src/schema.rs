//! Schema representation types.
//!
//! These types describe tables the way the differ sees them: an identity
//! (`class_name` plus physical `tablename`) and an ordered list of column
//! descriptors. They're produced both by the model layer (the live schema)
//! and by replaying migrations (the snapshot).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single column attribute value (length, nullable, default, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// No value.
    Null,
    /// Boolean attribute.
    Bool(bool),
    /// Integer attribute.
    Integer(i64),
    /// Float attribute.
    Float(f64),
    /// String attribute.
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing `.0` on whole floats
            Self::Float(x) => write!(f, "{:?}", x),
            Self::String(s) => write!(f, "{}", quote(s)),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Column attributes keyed by name. Sorted, so rendering is stable.
pub type Params = BTreeMap<String, ParamValue>;

/// Builds a [`Params`] map from key/value pairs.
#[must_use]
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Renders a params map as a call argument, e.g. `{'length': 100}`.
#[must_use]
pub fn render_params(params: &Params) -> String {
    let entries: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}: {}", quote(k), v))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Single-quotes a string for a generated call.
pub(crate) fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// A column as seen by the differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table.
    pub name: String,
    /// Column kind (e.g. "Varchar", "Integer").
    pub type_name: String,
    /// Column attributes.
    #[serde(default)]
    pub params: Params,
}

impl ColumnDescriptor {
    /// Creates a column with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            params: Params::new(),
        }
    }

    /// Sets an attribute.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces all attributes.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// A table identity plus its ordered columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffableTable {
    /// Identifier used by the model layer, unique within a schema.
    pub class_name: String,
    /// Physical table name.
    pub tablename: String,
    /// Columns in insertion order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl DiffableTable {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(class_name: impl Into<String>, tablename: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            tablename: tablename.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets a mutable column by name.
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut ColumnDescriptor> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Sorted `(name, type_name)` pairs, ignoring table identity and
    /// column order.
    #[must_use]
    pub fn column_shape(&self) -> Vec<(&str, &str)> {
        let mut shape: Vec<(&str, &str)> = self
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.type_name.as_str()))
            .collect();
        shape.sort_unstable();
        shape
    }

    /// Compares identity and columns, ignoring column order.
    #[must_use]
    pub fn same_structure(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.tablename == other.tablename
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .all(|c| other.get_column(&c.name) == Some(c))
    }
}
