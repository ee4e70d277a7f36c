//! Shared settings for the builders an application creates.

use crate::builder::{ExpressionListBuilder, InsertQueryBuilder, UpdateQueryBuilder};
use crate::dialect::DialectKind;
use crate::entity::{EntityMapper, PropertyBag};
use crate::error::QbResult;
use serde::Deserialize;

/// Configuration for the builders created through it.
///
/// Deserializable so it can live in an application's config file:
///
/// ```rust
/// use sqlweave::{DialectKind, QueryConfig};
///
/// let config: QueryConfig = serde_json::from_str(
///     r#"{ "dialect": "postgresql", "table_prefix": "app_" }"#,
/// ).unwrap();
/// assert_eq!(config.dialect, DialectKind::Postgres);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// SQL dialect.
    pub dialect: DialectKind,
    /// Prepended to every table name.
    pub table_prefix: Option<String>,
    /// Schema (or MySQL database) qualifying every table.
    pub schema: Option<String>,
    /// Explicit RETURNING columns instead of `*` (PostgreSQL only).
    pub returning: Option<String>,
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the table prefix.
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set explicit RETURNING columns.
    pub fn returning(mut self, columns: impl Into<String>) -> Self {
        self.returning = Some(columns.into());
        self
    }

    /// An INSERT into `table` with this configuration applied.
    pub fn insert_into(&self, table: &str) -> InsertQueryBuilder {
        let mut qb = InsertQueryBuilder::new(self.dialect);
        qb.set_table_name(table);
        if let Some(prefix) = &self.table_prefix {
            qb.set_table_prefix(prefix);
        }
        if let Some(schema) = &self.schema {
            qb.set_schema_name(schema);
        }
        if let Some(columns) = &self.returning {
            qb.returning(columns);
        }
        qb
    }

    /// An UPDATE of `table` with this configuration applied.
    pub fn update(&self, table: &str) -> UpdateQueryBuilder {
        let mut qb = UpdateQueryBuilder::new(self.dialect);
        qb.set_table_name(table);
        if let Some(prefix) = &self.table_prefix {
            qb.set_table_prefix(prefix);
        }
        if let Some(schema) = &self.schema {
            qb.set_schema_name(schema);
        }
        if let Some(columns) = &self.returning {
            qb.returning(columns);
        }
        qb
    }

    /// A comma-separated expression list in this dialect.
    pub fn expression_list(&self) -> ExpressionListBuilder {
        ExpressionListBuilder::comma_separated(self.dialect)
    }

    /// An INSERT into `table` with one VALUES group per entity.
    pub fn insert_entities<'a, E, I>(
        &self,
        table: &str,
        mapper: &EntityMapper,
        entities: I,
    ) -> QbResult<InsertQueryBuilder>
    where
        E: PropertyBag + ?Sized + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut qb = self.insert_into(table);
        mapper.insert_entities(&mut qb, entities)?;
        Ok(qb)
    }

    /// An UPDATE of `table` setting `entity`'s updatable fields.
    pub fn update_entity(
        &self,
        table: &str,
        mapper: &EntityMapper,
        entity: &(impl PropertyBag + ?Sized),
    ) -> UpdateQueryBuilder {
        let mut qb = self.update(table);
        mapper.update_entity(&mut qb, entity);
        qb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::QueryBuilder;
    use crate::entity::EntityField;
    use serde_json::json;

    #[test]
    fn defaults_to_mysql_without_prefix() {
        let config: QueryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, QueryConfig::default());
        assert_eq!(config.dialect, DialectKind::MySql);
        assert!(config.table_prefix.is_none());
    }

    #[test]
    fn insert_into_applies_prefix_and_schema() {
        let config = QueryConfig::new()
            .dialect(DialectKind::Postgres)
            .table_prefix("db1_")
            .schema("inventory")
            .returning("id");
        let mut qb = config.insert_into("cars");
        qb.add_column_name("car_name").append_value_list(["hello"]);
        assert_eq!(
            qb.build_query_string().unwrap(),
            r#"INSERT INTO "inventory"."db1_cars" ("car_name") VALUES ($1) RETURNING id"#
        );
    }

    #[test]
    fn update_entity_uses_configured_dialect() {
        let config: QueryConfig =
            serde_json::from_value(json!({"dialect": "mysql", "table_prefix": "db1_"})).unwrap();
        let mapper = EntityMapper::new(&[EntityField::new("name", "name")], &[], [""; 0]);

        let mut filter = config.expression_list();
        filter.set_assignment_with_param("id", 3);
        let mut qb = config.update_entity("cars", &mapper, &json!({"name": "golf"}));
        qb.set_where_from_query_builder(filter);

        let built = qb.build().unwrap();
        assert_eq!(built.sql, "UPDATE ?? SET ?? = ? WHERE ?? = ?");
        assert_eq!(built.values[0], crate::Value::from("db1_cars"));
    }

    #[test]
    fn insert_entities_builds_multi_row() {
        let config = QueryConfig::new();
        let mapper = EntityMapper::new(&[EntityField::new("name", "name")], &[], [""; 0]);
        let rows = [json!({"name": "a"}), json!({"name": "b"})];
        let qb = config.insert_entities("cars", &mapper, &rows).unwrap();
        assert_eq!(qb.build_query_string().unwrap(), "INSERT INTO ?? (??) VALUES (?), (?)");
    }
}
