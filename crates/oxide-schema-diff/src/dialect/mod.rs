//! Target dialects.
//!
//! Rendering for a target goes through an explicit mapping from this closed
//! set of dialects; an unknown name is an error rather than a fallback.

use std::fmt;
use std::str::FromStr;

use crate::error::DiffError;

mod readable;

pub use readable::Readable;

/// A database dialect a projection can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgres,
}

impl Dialect {
    /// Every known dialect.
    pub const ALL: [Self; 2] = [Self::Sqlite, Self::Postgres];

    /// Returns the dialect name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }

    /// printf-style formatting function for this dialect.
    #[must_use]
    pub fn format_function(self) -> &'static str {
        match self {
            Self::Sqlite => "PRINTF",
            Self::Postgres => "FORMAT",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| DiffError::UnrecognizedDialect(s.to_string()))
    }
}
