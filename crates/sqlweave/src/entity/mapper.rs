use super::{EntityField, FieldKind, PropertyBag, TemporalProperty};
use crate::builder::{ExpressionListBuilder, InsertQueryBuilder, UpdateQueryBuilder};
use crate::dialect::DialectRef;
use crate::error::QbResult;
use crate::ident::Ident;
use crate::log;
use crate::value::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedField {
    property: String,
    column: String,
    kind: FieldKind,
}

impl PlannedField {
    fn read(&self, entity: &(impl PropertyBag + ?Sized)) -> Value {
        entity.property(&self.property).unwrap_or(Value::Null)
    }
}

/// Writes entities into INSERT and UPDATE builders.
///
/// The insert plan keeps insertable fields, the update plan keeps updatable ones; both
/// drop ignored properties and joined-entity fields. Field order is preserved, so column
/// order and value order always line up. When two fields map to the same column only the
/// first one is written.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use sqlweave::entity::{ColumnDefinition, EntityField, EntityMapper};
/// use sqlweave::{DialectKind, QueryBuilder};
///
/// let fields = vec![
///     EntityField::new("id", "id").read_only(),
///     EntityField::new("name", "name"),
///     EntityField::new("meta", "meta").with_column_definition(ColumnDefinition::Jsonb),
/// ];
/// let mapper = EntityMapper::new(&fields, &[], ["internal"]);
///
/// let qb = mapper
///     .insert_query(DialectKind::Postgres, "cars", [&json!({"name": "golf", "meta": {"doors": 3}})])
///     .unwrap();
/// assert_eq!(
///     qb.build_query_string().unwrap(),
///     r#"INSERT INTO "cars" ("name", "meta") VALUES ($1, $2) RETURNING *"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityMapper {
    insert_plan: Vec<PlannedField>,
    update_plan: Vec<PlannedField>,
}

impl EntityMapper {
    pub fn new<I, S>(fields: &[EntityField], temporal: &[TemporalProperty], ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignored: HashSet<String> = ignore.into_iter().map(|s| s.as_ref().to_string()).collect();
        let writable = |field: &&EntityField| {
            !ignored.contains(&field.property_name) && !field.field_type.is_joined_entity()
        };
        let plan = |field: &EntityField| PlannedField {
            property: field.property_name.clone(),
            column: field.column_name.clone(),
            kind: FieldKind::classify(field, temporal),
        };

        Self {
            insert_plan: unique_columns(
                fields.iter().filter(|f| f.insertable).filter(writable).map(plan),
            ),
            update_plan: unique_columns(
                fields.iter().filter(|f| f.updatable).filter(writable).map(plan),
            ),
        }
    }

    /// Columns written by an INSERT, in order.
    pub fn insert_columns(&self) -> impl Iterator<Item = &str> {
        self.insert_plan.iter().map(|f| f.column.as_str())
    }

    /// Columns written by an UPDATE, in order.
    pub fn update_columns(&self) -> impl Iterator<Item = &str> {
        self.update_plan.iter().map(|f| f.column.as_str())
    }

    /// One VALUES tuple for `entity`.
    pub fn insert_row_builder(
        &self,
        dialect: impl Into<DialectRef>,
        entity: &(impl PropertyBag + ?Sized),
    ) -> ExpressionListBuilder {
        let mut row = ExpressionListBuilder::comma_separated(dialect);
        for field in &self.insert_plan {
            let value = field.read(entity);
            match field.kind {
                FieldKind::Plain => row.set_param(value),
                FieldKind::Temporal => row.set_param_from_timestamp_string(value),
                FieldKind::Json => row.set_param_from_json(value),
            };
        }
        row
    }

    /// The SET assignments for `entity`.
    pub fn set_list_builder(
        &self,
        dialect: impl Into<DialectRef>,
        entity: &(impl PropertyBag + ?Sized),
    ) -> ExpressionListBuilder {
        let mut set = ExpressionListBuilder::comma_separated(dialect);
        for field in &self.update_plan {
            let column = Ident::parse(&field.column);
            let value = field.read(entity);
            match field.kind {
                FieldKind::Plain => set.set_assignment_with_param(column, value),
                FieldKind::Temporal => set.set_assignment_with_param_as_timestamp(column, value),
                FieldKind::Json => set.set_assignment_with_param_as_json(column, value),
            };
        }
        set
    }

    /// Register the insert columns on `qb` and append one VALUES group for `entity`.
    pub fn insert_entity(
        &self,
        qb: &mut InsertQueryBuilder,
        entity: &(impl PropertyBag + ?Sized),
    ) -> QbResult<()> {
        qb.add_column_names(self.insert_columns());
        let row = self.insert_row_builder(qb.dialect_ref().clone(), entity);
        qb.append_value_list_using_query_builder(&row)?;
        log::mapped_row("insert", qb.value_group_count(), row.len());
        Ok(())
    }

    /// Append one VALUES group per entity. Returns the number of rows appended.
    pub fn insert_entities<'a, E, I>(&self, qb: &mut InsertQueryBuilder, entities: I) -> QbResult<usize>
    where
        E: PropertyBag + ?Sized + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut rows = 0;
        for entity in entities {
            self.insert_entity(qb, entity)?;
            rows += 1;
        }
        Ok(rows)
    }

    /// Merge the SET assignments for `entity` into `qb`.
    pub fn update_entity(&self, qb: &mut UpdateQueryBuilder, entity: &(impl PropertyBag + ?Sized)) {
        let set = self.set_list_builder(qb.dialect_ref().clone(), entity);
        qb.append_set_list_using_query_builder(&set);
        log::mapped_row("update", 1, set.len());
    }

    /// A new INSERT into `table` holding one VALUES group per entity.
    pub fn insert_query<'a, E, I>(
        &self,
        dialect: impl Into<DialectRef>,
        table: &str,
        entities: I,
    ) -> QbResult<InsertQueryBuilder>
    where
        E: PropertyBag + ?Sized + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let mut qb = InsertQueryBuilder::new(dialect);
        qb.set_table_name(table);
        self.insert_entities(&mut qb, entities)?;
        Ok(qb)
    }

    /// A new UPDATE of `table` with the SET assignments for `entity`. The WHERE clause is
    /// left to the caller.
    pub fn update_query(
        &self,
        dialect: impl Into<DialectRef>,
        table: &str,
        entity: &(impl PropertyBag + ?Sized),
    ) -> UpdateQueryBuilder {
        let mut qb = UpdateQueryBuilder::new(dialect);
        qb.set_table_name(table);
        self.update_entity(&mut qb, entity);
        qb
    }
}

fn unique_columns(plan: impl Iterator<Item = PlannedField>) -> Vec<PlannedField> {
    let mut seen = HashSet::new();
    plan.filter(|field| {
        let first = seen.insert(field.column.clone());
        if !first {
            log::duplicate_column("EntityMapper", &field.column);
        }
        first
    })
    .collect()
}
