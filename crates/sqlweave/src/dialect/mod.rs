//! SQL dialect strategies.
//!
//! Builders are dialect-agnostic: they assemble [`Fragment`](crate::Fragment)s and hand
//! them to a [`Dialect`] for the final render. The dialect decides how placeholders look,
//! how identifiers are quoted or bound, how timestamp and JSON values are converted, and
//! what suffix (if any) closes an INSERT/UPDATE.
//!
//! | | MySQL | PostgreSQL |
//! |---|---|---|
//! | value placeholder | `?` | `$n` |
//! | identifier | `??` bound to the name | `"name"` inline |
//! | timestamp value | pre-formatted `YYYY-MM-DD HH:MM:SS` | `$n::timestamptz`, value unchanged |
//! | JSON value | serialized locally | bound as JSON |
//! | statement suffix | none | ` RETURNING *` |

mod mysql;
mod postgres;

pub use mysql::MySql;
pub use postgres::Postgres;

use crate::error::{QbError, QbResult};
use crate::fragment::Piece;
use crate::ident::Ident;
use crate::value::ValueFactory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shared handle to a dialect strategy.
pub type DialectRef = Arc<dyn Dialect>;

/// A SQL dialect's placeholder, quoting and conversion conventions.
pub trait Dialect: fmt::Debug + Send + Sync {
    fn kind(&self) -> DialectKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Placeholder token for the value at 1-based position `index`.
    fn value_placeholder(&self, index: usize) -> String;

    /// Render an identifier reference.
    fn render_identifier(&self, ident: &Ident, out: &mut Renderer<'_>);

    /// Render an identifier reference cast to text.
    fn render_identifier_as_text(&self, ident: &Ident, out: &mut Renderer<'_>);

    /// Render a timestamp column formatted as an ISO-8601 string.
    fn render_identifier_as_timestamp_string(&self, ident: &Ident, out: &mut Renderer<'_>);

    /// Render a placeholder cast to text.
    fn render_param_as_text(&self, value: ValueFactory, out: &mut Renderer<'_>);

    /// Render a placeholder for an ISO-8601 timestamp value.
    fn render_timestamp_param(&self, value: ValueFactory, out: &mut Renderer<'_>);

    /// Render a placeholder for a JSON value.
    fn render_json_param(&self, value: ValueFactory, out: &mut Renderer<'_>);

    /// Render `column = <timestamp placeholder>`.
    fn render_timestamp_assignment(&self, column: &Ident, value: ValueFactory, out: &mut Renderer<'_>);

    /// Text appended to every INSERT/UPDATE, if any.
    fn query_suffix(&self) -> Option<&'static str>;

    /// A RETURNING clause for explicit columns, if the dialect supports one.
    fn returning_clause(&self, _columns: &str) -> Option<String> {
        None
    }
}

/// Render state for one statement: SQL text plus the ordered value producers.
pub struct Renderer<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    values: Vec<ValueFactory>,
}

impl<'d> Renderer<'d> {
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            values: Vec::new(),
        }
    }

    /// Append literal SQL.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append the dialect's value placeholder and record its producer.
    pub fn push_bind(&mut self, value: ValueFactory) -> &mut Self {
        let placeholder = self.dialect.value_placeholder(self.values.len() + 1);
        self.sql.push_str(&placeholder);
        self.values.push(value);
        self
    }

    /// Append a fixed token (e.g. MySQL's `??`) and record its producer.
    pub fn push_bind_token(&mut self, token: &str, value: ValueFactory) -> &mut Self {
        self.sql.push_str(token);
        self.values.push(value);
        self
    }

    /// Number of values recorded so far.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn render_piece(&mut self, piece: &Piece) -> QbResult<()> {
        let dialect = self.dialect;
        match piece {
            Piece::Sql(text) => {
                self.push_sql(text);
            }
            Piece::Table => return Err(QbError::missing_table_name("Fragment")),
            Piece::Ident(ident) => dialect.render_identifier(ident, self),
            Piece::IdentAsText(ident) => dialect.render_identifier_as_text(ident, self),
            Piece::IdentAsTimestampString(ident) => {
                dialect.render_identifier_as_timestamp_string(ident, self)
            }
            Piece::Param(value) => {
                self.push_bind(value.clone());
            }
            Piece::ParamAsText(value) => dialect.render_param_as_text(value.clone(), self),
            Piece::TimestampParam(value) => dialect.render_timestamp_param(value.clone(), self),
            Piece::JsonParam(value) => dialect.render_json_param(value.clone(), self),
            Piece::TimestampAssignment { column, value } => {
                dialect.render_timestamp_assignment(column, value.clone(), self)
            }
        }
        Ok(())
    }

    pub fn finish(self) -> (String, Vec<ValueFactory>) {
        (self.sql, self.values)
    }
}

/// The supported dialects, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl DialectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
        }
    }

    /// The strategy implementing this dialect.
    pub fn dialect(self) -> DialectRef {
        match self {
            DialectKind::MySql => Arc::new(MySql),
            DialectKind::Postgres => Arc::new(Postgres),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

impl From<DialectKind> for DialectRef {
    fn from(kind: DialectKind) -> Self {
        kind.dialect()
    }
}

impl From<MySql> for DialectRef {
    fn from(d: MySql) -> Self {
        Arc::new(d)
    }
}

impl From<Postgres> for DialectRef {
    fn from(d: Postgres) -> Self {
        Arc::new(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_kind_parses_aliases() {
        assert_eq!("MySQL".parse::<DialectKind>().unwrap(), DialectKind::MySql);
        assert_eq!("postgresql".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!("pg".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert!("oracle".parse::<DialectKind>().is_err());
    }

    #[test]
    fn dialect_kind_deserializes_from_config_names() {
        let kind: DialectKind = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(kind, DialectKind::Postgres);
        let kind: DialectKind = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(kind, DialectKind::MySql);
    }

    #[test]
    fn kind_round_trips_through_strategy() {
        assert_eq!(DialectKind::Postgres.dialect().kind(), DialectKind::Postgres);
        assert_eq!(DialectKind::MySql.dialect().name(), "mysql");
    }

    #[test]
    fn renderer_numbers_placeholders_globally() {
        let pg = Postgres;
        let mut r = Renderer::new(&pg);
        r.push_bind(ValueFactory::bound(1))
            .push_sql(", ")
            .push_bind(ValueFactory::bound(2));
        assert_eq!(r.value_count(), 2);
        let (sql, _) = r.finish();
        assert_eq!(sql, "$1, $2");
    }
}
