//! Convenient imports for typical `sqlweave` usage.
//!
//! ```rust
//! use sqlweave::prelude::*;
//! ```

pub use crate::{
    BuiltQuery, DialectKind, ExpressionListBuilder, InsertQueryBuilder, QbError, QbResult,
    QueryBuilder, QueryConfig, UpdateQueryBuilder, Value,
};

pub use crate::entity::{ColumnDefinition, EntityField, EntityMapper, TemporalProperty};
