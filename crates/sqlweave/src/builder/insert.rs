//! INSERT query builder.

use super::table::TableTarget;
use super::{QueryBuilder, Returning};
use crate::dialect::{Dialect, DialectRef, MySql, Postgres};
use crate::entity::PropertyBag;
use crate::error::{QbError, QbResult, Section};
use crate::fragment::Fragment;
use crate::ident::Ident;
use crate::log;
use crate::value::Value;
use std::collections::HashSet;

const BUILDER: &str = "InsertQueryBuilder";

/// INSERT builder.
///
/// Renders `<prefix> (<columns>) VALUES <group>, <group>, ...` followed by the dialect's
/// suffix. The default prefix is `INSERT INTO <table>`, where the table is resolved when the
/// statement is built, so the table name may be set before or after the prefix.
///
/// # Example
///
/// ```rust
/// use sqlweave::{InsertQueryBuilder, QueryBuilder, Value};
///
/// let mut qb = InsertQueryBuilder::mysql();
/// qb.set_table_prefix("db1_")
///     .set_table_name("cars")
///     .add_column_name("car_name")
///     .append_value_list(["hello"]);
///
/// let built = qb.build().unwrap();
/// assert_eq!(built.sql, "INSERT INTO ?? (??) VALUES (?)");
/// assert_eq!(built.values, vec![
///     Value::from("db1_cars"),
///     Value::from("car_name"),
///     Value::from("hello"),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct InsertQueryBuilder {
    dialect: DialectRef,
    table: TableTarget,
    prefix: Vec<Fragment>,
    columns: Vec<Fragment>,
    values: Vec<Fragment>,
    column_names: HashSet<String>,
    returning: Returning,
}

impl InsertQueryBuilder {
    /// Create an INSERT builder with the default `INSERT INTO <table>` prefix.
    pub fn new(dialect: impl Into<DialectRef>) -> Self {
        let mut builder = Self::empty(dialect);
        let mut prefix = Fragment::sql("INSERT INTO ");
        prefix.push_table();
        builder.add_prefix_fragment(prefix);
        builder
    }

    /// Create an INSERT builder without any sections.
    pub fn empty(dialect: impl Into<DialectRef>) -> Self {
        Self {
            dialect: dialect.into(),
            table: TableTarget::new(),
            prefix: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
            column_names: HashSet::new(),
            returning: Returning::Default,
        }
    }

    /// Create a MySQL INSERT builder.
    pub fn mysql() -> Self {
        Self::new(MySql)
    }

    /// Create a PostgreSQL INSERT builder.
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

    /// Append a fragment to the column section.
    pub fn add_column_fragment(&mut self, fragment: Fragment) -> &mut Self {
        self.columns.push(fragment);
        self
    }

    /// Append one VALUES group. The fragment is wrapped in parentheses.
    pub fn add_value_fragment(&mut self, fragment: Fragment) -> &mut Self {
        let mut group = Fragment::sql("(");
        group.append(fragment).push_sql(")");
        self.values.push(group);
        self
    }

    // ==================== Columns ====================

    /// Add a column. Adding the same column twice is a no-op.
    ///
    /// Dots separate qualifiers in both dialects, the way the MySQL driver expands `??`.
    /// Double-quote a part to keep a dot inside it on PostgreSQL.
    pub fn add_column_name(&mut self, name: &str) -> &mut Self {
        if !self.column_names.insert(name.to_string()) {
            log::duplicate_column(BUILDER, name);
            return self;
        }
        let mut f = Fragment::new();
        f.push_ident(Ident::parse(name));
        self.add_column_fragment(f)
    }

    /// Add several columns in order.
    pub fn add_column_names<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_column_name(name.as_ref());
        }
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.contains(name)
    }

    // ==================== Values ====================

    /// Append one `(?, ?, ...)` group bound positionally to `values`.
    pub fn append_value_list<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut f = Fragment::new();
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                f.push_sql(", ");
            }
            f.push_bind(value);
        }
        self.add_value_fragment(f)
    }

    /// Append one group with `obj`'s properties in `column_names` order.
    ///
    /// Properties missing from `obj` are bound as NULL.
    pub fn append_value_object<I, S>(&mut self, column_names: I, obj: &(impl PropertyBag + ?Sized)) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<Value> = column_names
            .into_iter()
            .map(|name| obj.property(name.as_ref()).unwrap_or(Value::Null))
            .collect();
        self.append_value_list(values)
    }

    /// Append another builder's output as one VALUES group.
    ///
    /// Repeated calls produce a multi-row insert; each group's values follow the previous
    /// groups' values.
    pub fn append_value_list_using_query_builder(
        &mut self,
        builder: &(impl QueryBuilder + ?Sized),
    ) -> QbResult<&mut Self> {
        let fragment = builder.to_fragment()?;
        Ok(self.add_value_fragment(fragment))
    }

    /// Number of VALUES groups appended so far.
    pub fn value_group_count(&self) -> usize {
        self.values.len()
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
        if self.columns.is_empty() {
            return Err(QbError::empty_section(BUILDER, Section::Columns));
        }
        if self.values.is_empty() {
            return Err(QbError::empty_section(BUILDER, Section::Values));
        }
        Ok(())
    }
}

impl QueryBuilder for InsertQueryBuilder {
    fn kind(&self) -> &'static str {
        BUILDER
    }

    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn to_fragment(&self) -> QbResult<Fragment> {
        self.validate()?;

        let mut out = Fragment::join(self.prefix.iter().cloned(), " ");
        out.push_sql(" (");
        out.append(Fragment::join(self.columns.iter().cloned(), ", "));
        out.push_sql(") VALUES ");
        out.append(Fragment::join(self.values.iter().cloned(), ", "));
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

impl std::fmt::Display for InsertQueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_debug_string())
    }
}
