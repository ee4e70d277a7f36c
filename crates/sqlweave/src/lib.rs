//! # sqlweave
//!
//! Parameterized INSERT/UPDATE construction for MySQL and PostgreSQL.
//!
//! ## Features
//!
//! - **Positional safety**: placeholders and bound values are produced in one render pass, so
//!   their order always matches, however deeply fragments are nested
//! - **Two dialects, one assembler**: MySQL (`?` values, `??` identifiers) and PostgreSQL
//!   (`$n`, quoted identifiers, `RETURNING *`) are strategies behind the [`Dialect`] trait
//! - **Timestamp and JSON conversion**: ISO-8601 strings and JSON documents are bound the way
//!   each dialect expects
//! - **Entity mapping**: field metadata plus any property bag fills INSERT rows and UPDATE
//!   SET lists
//! - **Driver ready**: with the `postgres` feature, [`BuiltQuery::params_ref`] plugs straight
//!   into `tokio-postgres`
//!
//! ## Example
//!
//! ```rust
//! use sqlweave::prelude::*;
//!
//! let mut set = sqlweave::expression_list(DialectKind::MySql);
//! set.set_assignment_with_param_as_timestamp("updated_at", "2023-04-04T14:58:59Z");
//!
//! let mut filter = ExpressionListBuilder::and_separated(DialectKind::MySql);
//! filter.set_assignment_with_param("id", 10);
//!
//! let mut qb = sqlweave::update(DialectKind::MySql, "cars");
//! qb.append_set_list_using_query_builder(&set)
//!     .set_where_from_query_builder(filter);
//!
//! let built = qb.build()?;
//! assert_eq!(
//!     built.sql,
//!     "UPDATE ?? SET ?? = DATE_FORMAT(?, '%Y-%m-%d %H:%i:%s') WHERE ?? = ?"
//! );
//! assert_eq!(built.values[2], Value::from("2023-04-04 14:58:59"));
//! # Ok::<(), QbError>(())
//! ```

pub mod builder;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod fragment;
pub mod ident;
mod log;
pub mod prelude;
mod temporal;
pub mod value;

pub use builder::{
    BuiltQuery, ExpressionListBuilder, InsertQueryBuilder, QueryBuilder, Returning, TableTarget,
    UpdateQueryBuilder,
};
pub use config::QueryConfig;
pub use dialect::{Dialect, DialectKind, DialectRef, MySql, Postgres, Renderer, UnknownDialect};
pub use entity::{
    ColumnDefinition, EntityField, EntityMapper, FieldKind, FieldType, PropertyBag,
    TemporalProperty, TemporalType,
};
pub use error::{QbError, QbResult, Section};
pub use fragment::{Fragment, Piece};
pub use ident::Ident;
pub use value::{Value, ValueFactory};

/// Create an `INSERT INTO <table>` builder.
pub fn insert_into(dialect: impl Into<DialectRef>, table: &str) -> InsertQueryBuilder {
    let mut qb = InsertQueryBuilder::new(dialect);
    qb.set_table_name(table);
    qb
}

/// Create an `UPDATE <table>` builder.
pub fn update(dialect: impl Into<DialectRef>, table: &str) -> UpdateQueryBuilder {
    let mut qb = UpdateQueryBuilder::new(dialect);
    qb.set_table_name(table);
    qb
}

/// Create a comma-separated expression list.
pub fn expression_list(dialect: impl Into<DialectRef>) -> ExpressionListBuilder {
    ExpressionListBuilder::comma_separated(dialect)
}
