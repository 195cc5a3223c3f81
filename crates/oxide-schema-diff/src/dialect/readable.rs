//! Readable column projections.
//!
//! A [`Readable`] formats several columns into one display string, e.g. a
//! band's name and genre as `"Rustaceans (rock)"`. The formatting function
//! differs per dialect.

use serde::{Deserialize, Serialize};

use super::Dialect;
use crate::error::Result;

/// A formatted projection over several columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readable {
    /// printf-style template, e.g. `"%s (%s)"`.
    pub template: String,
    /// Referenced columns, already qualified as they appear in the query.
    pub columns: Vec<String>,
    /// Alias of the output column.
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_output_name() -> String {
    "readable".to_string()
}

impl Readable {
    /// Creates a projection with the default `readable` alias.
    #[must_use]
    pub fn new(template: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            template: template.into(),
            columns,
            output_name: default_output_name(),
        }
    }

    /// Sets the output alias.
    #[must_use]
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Renders the select expression for a dialect.
    #[must_use]
    pub fn select_string(&self, dialect: Dialect) -> String {
        format!(
            "{}('{}', {}) AS {}",
            dialect.format_function(),
            self.template.replace('\'', "''"),
            self.columns.join(", "),
            self.output_name
        )
    }

    /// Renders the select expression for a dialect given by name.
    pub fn get_select_string(&self, dialect: &str) -> Result<String> {
        Ok(self.select_string(dialect.parse()?))
    }
}
