use super::QueryBuilder;
use crate::dialect::{Dialect, DialectRef};
use crate::error::QbResult;
use crate::fragment::{Fragment, Piece};
use crate::ident::Ident;
use crate::value::{Value, ValueFactory};

/// Joins a sequence of fragments with a separator.
///
/// Used for value tuples (`?, ?, ?`) and SET lists (`a = ?, b = ?`), and with an
/// `" AND "` separator it doubles as a simple WHERE fragment.
///
/// # Example
///
/// ```rust
/// use sqlweave::{DialectKind, ExpressionListBuilder, QueryBuilder};
///
/// let mut list = ExpressionListBuilder::comma_separated(DialectKind::Postgres);
/// list.set_assignment_with_param("name", "alice")
///     .set_assignment_with_param_as_timestamp("seen_at", "2023-04-04T14:58:59Z");
/// assert_eq!(
///     list.build_query_string().unwrap(),
///     r#""name" = $1, "seen_at" = $2::timestamptz"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ExpressionListBuilder {
    dialect: DialectRef,
    separator: String,
    items: Vec<Fragment>,
}

impl ExpressionListBuilder {
    /// Create a list builder with a custom separator.
    pub fn new(dialect: impl Into<DialectRef>, separator: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            separator: separator.into(),
            items: Vec::new(),
        }
    }

    /// Create a `", "`-separated list builder.
    pub fn comma_separated(dialect: impl Into<DialectRef>) -> Self {
        Self::new(dialect, ", ")
    }

    /// Create an `" AND "`-separated list builder, e.g. for equality WHERE clauses.
    pub fn and_separated(dialect: impl Into<DialectRef>) -> Self {
        Self::new(dialect, " AND ")
    }

    /// Append one fragment.
    pub fn add_fragment(&mut self, fragment: Fragment) -> &mut Self {
        self.items.push(fragment);
        self
    }

    fn add_piece(&mut self, piece: Piece) -> &mut Self {
        self.add_fragment(Fragment::piece(piece))
    }

    // ==================== Column references ====================

    /// A qualified, dialect-quoted column reference.
    pub fn set_table_column(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_piece(Piece::Ident(column.into()))
    }

    /// A column reference cast to text.
    pub fn set_table_column_as_text(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_piece(Piece::IdentAsText(column.into()))
    }

    /// A timestamp column rendered as an ISO-8601 string.
    pub fn set_table_column_as_timestamp_string(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_piece(Piece::IdentAsTimestampString(column.into()))
    }

    // ==================== Parameters ====================

    /// A positional placeholder bound to `value`.
    pub fn set_param(&mut self, value: impl Into<Value>) -> &mut Self {
        self.add_piece(Piece::Param(ValueFactory::bound(value)))
    }

    /// A positional placeholder whose value is computed when the query is built.
    pub fn set_param_factory<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.add_piece(Piece::Param(ValueFactory::deferred(f)))
    }

    /// A placeholder cast to text.
    pub fn set_param_as_text(&mut self, value: impl Into<Value>) -> &mut Self {
        self.add_piece(Piece::ParamAsText(ValueFactory::bound(value)))
    }

    /// A placeholder for an ISO-8601 timestamp string.
    pub fn set_param_from_timestamp_string(&mut self, value: impl Into<Value>) -> &mut Self {
        self.add_piece(Piece::TimestampParam(ValueFactory::bound(value)))
    }

    /// A placeholder for a value stored as JSON.
    pub fn set_param_from_json(&mut self, value: impl Into<Value>) -> &mut Self {
        self.add_piece(Piece::JsonParam(ValueFactory::bound(value)))
    }

    // ==================== Assignments ====================

    /// `column = <placeholder>`
    pub fn set_assignment_with_param(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        let mut f = Fragment::new();
        f.push_ident(column).push_sql(" = ").push_bind(value);
        self.add_fragment(f)
    }

    /// `column = <timestamp placeholder>`
    pub fn set_assignment_with_param_as_timestamp(
        &mut self,
        column: impl Into<Ident>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_piece(Piece::TimestampAssignment {
            column: column.into(),
            value: ValueFactory::bound(value),
        })
    }

    /// `column = <JSON placeholder>`
    pub fn set_assignment_with_param_as_json(
        &mut self,
        column: impl Into<Ident>,
        value: impl Into<Value>,
    ) -> &mut Self {
        let mut f = Fragment::new();
        f.push_ident(column)
            .push_sql(" = ")
            .push_piece(Piece::JsonParam(ValueFactory::bound(value)));
        self.add_fragment(f)
    }

    // ==================== Inspection ====================

    pub fn fragments(&self) -> &[Fragment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn dialect_ref(&self) -> &DialectRef {
        &self.dialect
    }
}

impl QueryBuilder for ExpressionListBuilder {
    fn kind(&self) -> &'static str {
        "ExpressionListBuilder"
    }

    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn to_fragment(&self) -> QbResult<Fragment> {
        Ok(Fragment::join(self.items.iter().cloned(), &self.separator))
    }
}

impl std::fmt::Display for ExpressionListBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}
