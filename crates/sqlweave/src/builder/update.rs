//! UPDATE query builder.

use super::list::ExpressionListBuilder;
use super::table::TableTarget;
use super::{QueryBuilder, Returning};
use crate::dialect::{Dialect, DialectRef, MySql, Postgres};
use crate::error::{QbError, QbResult, Section};
use crate::fragment::Fragment;

const BUILDER: &str = "UpdateQueryBuilder";

/// UPDATE builder.
///
/// Renders `<prefix> SET <assignments>[ WHERE <where>]` followed by the dialect's suffix.
/// The WHERE clause comes from any other [`QueryBuilder`], treated as an opaque fragment;
/// its values are placed after the SET values.
///
/// # Example
///
/// ```rust
/// use sqlweave::{DialectKind, ExpressionListBuilder, QueryBuilder, UpdateQueryBuilder};
///
/// let mut set = ExpressionListBuilder::comma_separated(DialectKind::Postgres);
/// set.set_assignment_with_param("status", "inactive");
///
/// let mut filter = ExpressionListBuilder::and_separated(DialectKind::Postgres);
/// filter.set_assignment_with_param("id", 7);
///
/// let mut qb = UpdateQueryBuilder::postgres();
/// qb.set_table_name("users")
///     .append_set_list_using_query_builder(&set)
///     .set_where_from_query_builder(filter);
///
/// assert_eq!(
///     qb.build_query_string().unwrap(),
///     r#"UPDATE "users" SET "status" = $1 WHERE "id" = $2 RETURNING *"#
/// );
/// ```
#[derive(Debug)]
pub struct UpdateQueryBuilder {
    dialect: DialectRef,
    table: TableTarget,
    prefix: Vec<Fragment>,
    set: Vec<Fragment>,
    where_builder: Option<Box<dyn QueryBuilder>>,
    returning: Returning,
}

impl UpdateQueryBuilder {
    /// Create an UPDATE builder with the default `UPDATE <table>` prefix.
    pub fn new(dialect: impl Into<DialectRef>) -> Self {
        let mut builder = Self::empty(dialect);
        let mut prefix = Fragment::sql("UPDATE ");
        prefix.push_table();
        builder.add_prefix_fragment(prefix);
        builder
    }

    /// Create an UPDATE builder without any sections.
    pub fn empty(dialect: impl Into<DialectRef>) -> Self {
        Self {
            dialect: dialect.into(),
            table: TableTarget::new(),
            prefix: Vec::new(),
            set: Vec::new(),
            where_builder: None,
            returning: Returning::Default,
        }
    }

    /// Create a MySQL UPDATE builder.
    pub fn mysql() -> Self {
        Self::new(MySql)
    }

    /// Create a PostgreSQL UPDATE builder.
    pub fn postgres() -> Self {
        Self::new(Postgres)
    }

    pub fn dialect_ref(&self) -> &DialectRef {
        &self.dialect
    }

    // ==================== Table ====================

    pub fn set_table_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.table.set_name(name);
        self
    }

    pub fn set_table_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.table.set_prefix(prefix);
        self
    }

    pub fn set_schema_name(&mut self, schema: impl Into<String>) -> &mut Self {
        self.table.set_schema(schema);
        self
    }

    pub fn table(&self) -> &TableTarget {
        &self.table
    }

    /// `prefix + name`. Fails if no table name was set.
    pub fn full_table_name(&self) -> QbResult<String> {
        self.table.full_name(BUILDER)
    }

    /// The schema-qualified table name. Fails if no table name was set.
    pub fn complete_table_name(&self) -> QbResult<String> {
        self.table.complete_name(BUILDER)
    }

    // ==================== Sections ====================

    /// Append a fragment to the prefix section.
    pub fn add_prefix_fragment(&mut self, fragment: Fragment) -> &mut Self {
        self.prefix.push(fragment);
        self
    }

    /// Append one assignment to the SET section.
    pub fn add_set_fragment(&mut self, fragment: Fragment) -> &mut Self {
        self.set.push(fragment);
        self
    }

    /// Merge every assignment of `list` into the SET section, in order.
    pub fn append_set_list_using_query_builder(&mut self, list: &ExpressionListBuilder) -> &mut Self {
        self.set.extend(list.fragments().iter().cloned());
        self
    }

    /// Use `builder` as the WHERE clause, replacing any previous one.
    pub fn set_where_from_query_builder(&mut self, builder: impl QueryBuilder + 'static) -> &mut Self {
        self.where_builder = Some(Box::new(builder));
        self
    }

    pub fn has_where(&self) -> bool {
        self.where_builder.is_some()
    }

    /// Number of SET assignments appended so far.
    pub fn set_count(&self) -> usize {
        self.set.len()
    }

    // ==================== RETURNING ====================

    /// Replace the default `RETURNING *` with explicit columns (PostgreSQL only).
    pub fn returning(&mut self, columns: impl Into<String>) -> &mut Self {
        self.returning = Returning::Columns(columns.into());
        self
    }

    /// Suppress the RETURNING clause.
    pub fn without_returning(&mut self) -> &mut Self {
        self.returning = Returning::Disabled;
        self
    }

    fn validate(&self) -> QbResult<()> {
        if self.prefix.is_empty() {
            return Err(QbError::empty_section(BUILDER, Section::Prefix));
        }
        if self.set.is_empty() {
            return Err(QbError::empty_section(BUILDER, Section::Set));
        }
        Ok(())
    }
}

impl QueryBuilder for UpdateQueryBuilder {
    fn kind(&self) -> &'static str {
        BUILDER
    }

    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn to_fragment(&self) -> QbResult<Fragment> {
        self.validate()?;

        let mut out = Fragment::join(self.prefix.iter().cloned(), " ");
        out.push_sql(" SET ");
        out.append(Fragment::join(self.set.iter().cloned(), ", "));

        if let Some(where_builder) = &self.where_builder {
            let condition = where_builder.to_fragment()?;
            if !condition.is_empty() {
                out.push_sql(" WHERE ");
                out.append(condition);
            }
        }

        if let Some(suffix) = self.returning.suffix(self.dialect()) {
            out.push_sql(&suffix);
        }

        if out.references_table() {
            let table = self.table.complete_ident(BUILDER)?;
            out = out.resolve_table(&table);
        }
        Ok(out)
    }
}

impl std::fmt::Display for UpdateQueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn assignments(dialect: impl Into<DialectRef>) -> ExpressionListBuilder {
        let mut set = ExpressionListBuilder::comma_separated(dialect);
        set.set_assignment_with_param("name", "Alice")
            .set_assignment_with_param("email", "alice@example.com");
        set
    }

    #[test]
    fn test_update_without_where_omits_keyword() {
        let mut qb = UpdateQueryBuilder::mysql();
        qb.set_table_name("users")
            .append_set_list_using_query_builder(&assignments(MySql));
        assert_eq!(qb.build_query_string().unwrap(), "UPDATE ?? SET ?? = ?, ?? = ?");
        assert!(!qb.has_where());
        assert_eq!(qb.set_count(), 2);
    }

    #[test]
    fn test_update_where_values_come_last() {
        let mut filter = ExpressionListBuilder::and_separated(Postgres);
        filter.set_assignment_with_param("id", 1).set_assignment_with_param("tenant", 9);

        let mut qb = UpdateQueryBuilder::postgres();
        qb.set_table_name("users")
            .set_where_from_query_builder(filter)
            .append_set_list_using_query_builder(&assignments(Postgres));

        let built = qb.build().unwrap();
        assert_eq!(
            built.sql,
            r#"UPDATE "users" SET "name" = $1, "email" = $2 WHERE "id" = $3 AND "tenant" = $4 RETURNING *"#
        );
        assert_eq!(
            built.values,
            vec![
                Value::from("Alice"),
                Value::from("alice@example.com"),
                Value::Int(1),
                Value::Int(9)
            ]
        );
    }

    #[test]
    fn test_update_requires_set() {
        let mut qb = UpdateQueryBuilder::postgres();
        qb.set_table_name("users");
        let err = qb.build_query_string().unwrap_err();
        assert!(err.is_empty_section(Some(Section::Set)));
        assert_eq!(err.to_string(), "UpdateQueryBuilder: set section is empty");
    }

    #[test]
    fn test_update_requires_prefix() {
        let mut qb = UpdateQueryBuilder::empty(Postgres);
        qb.append_set_list_using_query_builder(&assignments(Postgres));
        assert!(qb.build().unwrap_err().is_empty_section(Some(Section::Prefix)));
    }

    #[test]
    fn test_update_requires_table_name() {
        let mut qb = UpdateQueryBuilder::mysql();
        qb.append_set_list_using_query_builder(&assignments(MySql));
        assert!(qb.build().unwrap_err().is_missing_table_name());
    }

    #[test]
    fn test_empty_where_builder_is_omitted() {
        let mut qb = UpdateQueryBuilder::mysql();
        qb.set_table_name("users")
            .append_set_list_using_query_builder(&assignments(MySql))
            .set_where_from_query_builder(ExpressionListBuilder::and_separated(MySql));
        assert!(!qb.build_query_string().unwrap().contains("WHERE"));
    }

    #[test]
    fn test_display_reports_errors() {
        let qb = UpdateQueryBuilder::mysql();
        assert_eq!(qb.to_string(), "<UpdateQueryBuilder: set section is empty>");
    }
}
