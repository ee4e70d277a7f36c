//! Entity metadata and its mapping onto INSERT/UPDATE builders.
//!
//! An entity is described by a list of [`EntityField`]s (property → column, writability,
//! storage kind) plus a list of [`TemporalProperty`] markers. The entity itself is read
//! through [`PropertyBag`], so any JSON object, map, or `Serialize` type can be written.
//!
//! Each field is classified once into a [`FieldKind`]:
//!
//! - `Temporal` if a `TemporalProperty` names it or its column definition is time-like
//! - otherwise `Json` if its column definition is `JSON`/`JSONB`
//! - otherwise `Plain`
//!
//! [`EntityMapper`] then drives the expression list and statement builders with those kinds.

mod mapper;

pub use mapper::EntityMapper;

use crate::error::{QbError, QbResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

// ==================== Column definitions ====================

/// The storage kind of a column, as declared in entity metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnDefinition {
    Json,
    Jsonb,
    Timestamp,
    Timestamptz,
    Date,
    Datetz,
    Datetime,
    Datetimetz,
    Time,
    Timetz,
    Bigint,
}

impl ColumnDefinition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::Timestamp => "TIMESTAMP",
            Self::Timestamptz => "TIMESTAMPTZ",
            Self::Date => "DATE",
            Self::Datetz => "DATETZ",
            Self::Datetime => "DATETIME",
            Self::Datetimetz => "DATETIMETZ",
            Self::Time => "TIME",
            Self::Timetz => "TIMETZ",
            Self::Bigint => "BIGINT",
        }
    }

    /// Date, time and timestamp kinds, with or without a zone.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Timestamp
                | Self::Timestamptz
                | Self::Date
                | Self::Datetz
                | Self::Datetime
                | Self::Datetimetz
                | Self::Time
                | Self::Timetz
        )
    }

    pub fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::Jsonb)
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown column definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column definition: {0}")]
pub struct UnknownColumnDefinition(pub String);

impl FromStr for ColumnDefinition {
    type Err = UnknownColumnDefinition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let def = match s.trim().to_ascii_uppercase().as_str() {
            "JSON" => Self::Json,
            "JSONB" => Self::Jsonb,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::Timestamptz,
            "DATE" => Self::Date,
            "DATETZ" => Self::Datetz,
            "DATETIME" => Self::Datetime,
            "DATETIMETZ" => Self::Datetimetz,
            "TIME" => Self::Time,
            "TIMETZ" => Self::Timetz,
            "BIGINT" => Self::Bigint,
            _ => return Err(UnknownColumnDefinition(s.to_string())),
        };
        Ok(def)
    }
}

// ==================== Fields ====================

/// The declared type of an entity property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    /// A related entity loaded through a join; never written.
    JoinedEntity,
    /// A list of related entities loaded through a join; never written.
    JoinedEntityList,
}

impl FieldType {
    pub fn is_joined_entity(self) -> bool {
        matches!(self, Self::JoinedEntity | Self::JoinedEntityList)
    }
}

fn default_true() -> bool {
    true
}

/// Mapping of one entity property to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityField {
    pub property_name: String,
    pub column_name: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default = "default_true")]
    pub insertable: bool,
    #[serde(default = "default_true")]
    pub updatable: bool,
    #[serde(default)]
    pub column_definition: Option<ColumnDefinition>,
}

impl EntityField {
    /// A writable `String` field.
    pub fn new(property_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            column_name: column_name.into(),
            field_type: FieldType::default(),
            insertable: true,
            updatable: true,
            column_definition: None,
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_column_definition(mut self, def: ColumnDefinition) -> Self {
        self.column_definition = Some(def);
        self
    }

    /// Neither inserted nor updated (e.g. a generated key).
    pub fn read_only(mut self) -> Self {
        self.insertable = false;
        self.updatable = false;
        self
    }

    /// Written on INSERT only (e.g. `created_at`).
    pub fn insert_only(mut self) -> Self {
        self.updatable = false;
        self
    }

    /// Written on UPDATE only.
    pub fn update_only(mut self) -> Self {
        self.insertable = false;
        self
    }
}

/// Granularity of a temporal property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalType {
    Date,
    Time,
    #[default]
    Timestamp,
}

/// Marks a property as needing date/time conversion regardless of its column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalProperty {
    pub property_name: String,
    #[serde(default)]
    pub temporal_type: TemporalType,
}

impl TemporalProperty {
    pub fn new(property_name: impl Into<String>, temporal_type: TemporalType) -> Self {
        Self {
            property_name: property_name.into(),
            temporal_type,
        }
    }

    pub fn timestamp(property_name: impl Into<String>) -> Self {
        Self::new(property_name, TemporalType::Timestamp)
    }
}

// ==================== Classification ====================

/// How a field's value is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Plain,
    Temporal,
    Json,
}

impl FieldKind {
    /// Classify `field`. Temporal wins over JSON.
    pub fn classify(field: &EntityField, temporal: &[TemporalProperty]) -> Self {
        let marked = temporal
            .iter()
            .any(|t| t.property_name == field.property_name);
        match field.column_definition {
            _ if marked => Self::Temporal,
            Some(def) if def.is_temporal() => Self::Temporal,
            Some(def) if def.is_json() => Self::Json,
            _ => Self::Plain,
        }
    }
}

// ==================== Property access ====================

/// Read access to an entity's properties by name.
pub trait PropertyBag {
    /// The property's value, or `None` when the entity has no such property.
    fn property(&self, name: &str) -> Option<Value>;
}

impl<T: PropertyBag + ?Sized> PropertyBag for &T {
    fn property(&self, name: &str) -> Option<Value> {
        (**self).property(name)
    }
}

impl PropertyBag for serde_json::Map<String, serde_json::Value> {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Value::from_json)
    }
}

/// Only objects have properties.
impl PropertyBag for serde_json::Value {
    fn property(&self, name: &str) -> Option<Value> {
        self.as_object()?.property(name)
    }
}

impl<S: BuildHasher> PropertyBag for HashMap<String, Value, S> {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl PropertyBag for BTreeMap<String, Value> {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Serialize a typed entity into a property bag.
///
/// # Example
///
/// ```rust
/// use sqlweave::entity::{to_property_bag, PropertyBag};
/// use sqlweave::Value;
///
/// #[derive(serde::Serialize)]
/// struct Car { name: String, year: i32 }
///
/// let bag = to_property_bag(&Car { name: "golf".into(), year: 1999 }).unwrap();
/// assert_eq!(bag.property("year"), Some(Value::Int(1999)));
/// assert_eq!(bag.property("color"), None);
/// ```
pub fn to_property_bag<T: Serialize + ?Sized>(
    entity: &T,
) -> QbResult<serde_json::Map<String, serde_json::Value>> {
    match serde_json::to_value(entity)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(QbError::InvalidEntity(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
