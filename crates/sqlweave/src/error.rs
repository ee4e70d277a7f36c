//! Error types for sqlweave

use std::fmt;
use thiserror::Error;

/// Result type alias for query construction.
pub type QbResult<T> = Result<T, QbError>;

/// A named section of an INSERT or UPDATE statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `INSERT INTO <table>` / `UPDATE <table>`
    Prefix,
    /// The parenthesised column list of an INSERT.
    Columns,
    /// The VALUES groups of an INSERT.
    Values,
    /// The SET assignments of an UPDATE.
    Set,
}

impl Section {
    /// Lower-case name used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Prefix => "prefix",
            Section::Columns => "columns",
            Section::Values => "values",
            Section::Set => "set",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while assembling a statement.
///
/// These are configuration errors: the builder was used incorrectly. Problems with the
/// bound values themselves are left to the driver that executes the statement.
#[derive(Debug, Error)]
pub enum QbError {
    /// The table name was never assigned.
    #[error("{builder}: table name has not been set")]
    MissingTableName { builder: &'static str },

    /// A required section has no fragments.
    #[error("{builder}: {section} section is empty")]
    EmptySection {
        builder: &'static str,
        section: Section,
    },

    /// An entity could not be serialized into a property bag.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An entity did not serialize to an object.
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),
}

impl QbError {
    /// Create a missing table name error
    pub fn missing_table_name(builder: &'static str) -> Self {
        Self::MissingTableName { builder }
    }

    /// Create an empty section error
    pub fn empty_section(builder: &'static str, section: Section) -> Self {
        Self::EmptySection { builder, section }
    }

    /// Check if this is a missing table name error
    pub fn is_missing_table_name(&self) -> bool {
        matches!(self, Self::MissingTableName { .. })
    }

    /// Check if this is an empty section error, optionally for a specific section
    pub fn is_empty_section(&self, section: Option<Section>) -> bool {
        match (self, section) {
            (Self::EmptySection { .. }, None) => true,
            (Self::EmptySection { section: s, .. }, Some(want)) => *s == want,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for QbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
