//! Statement builders.
//!
//! Every builder implements [`QueryBuilder`]: it can turn itself into a dialect-neutral
//! [`Fragment`] and render that fragment into `(sql, values)` with its dialect.
//!
//! ## Design
//!
//! - Builders are mutated through `&mut self` chains and only read when built, so building
//!   is repeatable and yields identical output every time.
//! - Sub-builders compose by fragment: an [`ExpressionListBuilder`] spliced into an insert or
//!   update keeps its values in place, and placeholders are numbered once for the whole
//!   statement.
//! - Missing required sections are configuration errors reported by `build`.

pub mod insert;
pub mod list;
pub mod table;
pub mod update;

pub use insert::InsertQueryBuilder;
pub use list::ExpressionListBuilder;
pub use table::TableTarget;
pub use update::UpdateQueryBuilder;

use crate::dialect::Dialect;
use crate::error::QbResult;
use crate::fragment::Fragment;
use crate::log;
use crate::value::{Value, ValueFactory};
use std::fmt;

/// Base trait for all query builders.
pub trait QueryBuilder: fmt::Debug + Send + Sync {
    /// Builder name used in errors and logs.
    fn kind(&self) -> &'static str;

    /// The dialect this builder renders with.
    fn dialect(&self) -> &dyn Dialect;

    /// Assemble the statement as a dialect-neutral fragment.
    fn to_fragment(&self) -> QbResult<Fragment>;

    /// Render the SQL string and the ordered value producers.
    fn render(&self) -> QbResult<(String, Vec<ValueFactory>)> {
        self.to_fragment()?.render(self.dialect())
    }

    /// Build the SQL string.
    fn build_query_string(&self) -> QbResult<String> {
        Ok(self.render()?.0)
    }

    /// The value producers, one per placeholder, in placeholder order.
    fn query_value_factories(&self) -> QbResult<Vec<ValueFactory>> {
        Ok(self.render()?.1)
    }

    /// Produce every positional value, in placeholder order.
    fn build_query_values(&self) -> QbResult<Vec<Value>> {
        Ok(self
            .query_value_factories()?
            .iter()
            .map(ValueFactory::produce)
            .collect())
    }

    /// Build the SQL string and its values together.
    fn build(&self) -> QbResult<BuiltQuery> {
        let (sql, factories) = self.render()?;
        let values: Vec<Value> = factories.iter().map(ValueFactory::produce).collect();
        log::built_query(self.kind(), self.dialect().name(), &sql, values.len());
        Ok(BuiltQuery::new(sql, values))
    }

    /// Human-readable rendering for debugging. Not meant for execution.
    fn to_debug_string(&self) -> String {
        match self.render() {
            Ok((sql, factories)) => {
                let values: Vec<Value> = factories.iter().map(ValueFactory::produce).collect();
                BuiltQuery::new(sql, values).to_string()
            }
            Err(err) => format!("<{err}>"),
        }
    }
}

/// The result of building a query.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, values: Vec<Value>) -> Self {
        Self { sql, values }
    }

    /// Number of positional values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }

    /// Get parameters as references for tokio-postgres.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn tokio_postgres::types::ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect()
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- [", self.sql)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// How the statement ends on dialects that support `RETURNING`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Returning {
    /// The dialect's own suffix (`RETURNING *` on PostgreSQL).
    #[default]
    Default,
    /// `RETURNING <columns>`
    Columns(String),
    /// No suffix at all.
    Disabled,
}

impl Returning {
    pub(crate) fn suffix(&self, dialect: &dyn Dialect) -> Option<String> {
        match self {
            Returning::Default => dialect.query_suffix().map(str::to_string),
            Returning::Columns(cols) => dialect.returning_clause(cols),
            Returning::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests;
