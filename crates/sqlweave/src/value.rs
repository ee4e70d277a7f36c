//! Bound parameter values and their producers.
//!
//! A [`Value`] is what ends up in the positional parameter array handed to the driver.
//! A [`ValueFactory`] is the producer stored inside a fragment: it is resolved only when
//! the statement is built, so a fragment can be composed long before its value exists.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;

/// A positional parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A JSON document (objects, arrays, or a scalar destined for a JSON column).
    Json(serde_json::Value),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the value as a string slice, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an i64, if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert a JSON document into a value.
    ///
    /// Scalars map onto the matching scalar variant; objects and arrays stay JSON.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }

    /// The JSON representation of this value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Json(v) => v.clone(),
            Self::Timestamp(ts) => {
                serde_json::Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Json(v) => write!(f, "'{v}'"),
            Self::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::from_json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A deferred producer of one positional parameter value.
///
/// Each factory corresponds to exactly one placeholder in the rendered SQL.
#[derive(Clone)]
pub enum ValueFactory {
    /// A value known when the fragment was created.
    Bound(Value),
    /// A value computed each time the statement is built.
    Deferred(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl ValueFactory {
    /// Wrap an already known value.
    pub fn bound(value: impl Into<Value>) -> Self {
        Self::Bound(value.into())
    }

    /// Wrap a closure that produces the value at build time.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(f))
    }

    /// Produce the value.
    pub fn produce(&self) -> Value {
        match self {
            Self::Bound(v) => v.clone(),
            Self::Deferred(f) => f(),
        }
    }

    /// Compose a conversion onto this producer.
    ///
    /// Bound values are converted immediately; deferred values are converted each time
    /// they are produced.
    pub fn map<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        match self {
            Self::Bound(v) => Self::Bound(f(v)),
            Self::Deferred(g) => Self::Deferred(Arc::new(move || f(g()))),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl fmt::Debug for ValueFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(v) => f.debug_tuple("Bound").field(v).finish(),
            Self::Deferred(_) => f.debug_tuple("Deferred").field(&"<fn>").finish(),
        }
    }
}

impl From<Value> for ValueFactory {
    fn from(v: Value) -> Self {
        Self::Bound(v)
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use super::Value;
    use crate::temporal;
    use bytes::BytesMut;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use std::error::Error;
    use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};

    type BoxError = Box<dyn Error + Sync + Send>;

    fn is_text(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty)
    }

    fn is_json(ty: &Type) -> bool {
        <serde_json::Value as ToSql>::accepts(ty)
    }

    fn is_temporal(ty: &Type) -> bool {
        <DateTime<Utc> as ToSql>::accepts(ty)
            || <NaiveDateTime as ToSql>::accepts(ty)
            || <NaiveDate as ToSql>::accepts(ty)
    }

    fn wrong_type(ty: &Type) -> Result<IsNull, BoxError> {
        Err(Box::new(WrongType::new::<Value>(ty.clone())))
    }

    // Each variant converts only to the parameter types listed in its arm; anything else
    // is rejected before a byte is written.
    impl ToSql for Value {
        fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
            match self {
                Value::Null => Ok(IsNull::Yes),
                Value::Bool(v) => match *ty {
                    Type::BOOL => v.to_sql(ty, out),
                    _ => wrong_type(ty),
                },
                Value::Int(v) => match *ty {
                    Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                    Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                    Type::INT8 => v.to_sql(ty, out),
                    Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                    Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                    _ if is_json(ty) => serde_json::Value::from(*v).to_sql(ty, out),
                    _ if is_text(ty) => v.to_string().to_sql(ty, out),
                    _ => wrong_type(ty),
                },
                Value::Float(v) => match *ty {
                    Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                    Type::FLOAT8 => v.to_sql(ty, out),
                    _ if is_json(ty) => Value::Float(*v).to_json().to_sql(ty, out),
                    _ if is_text(ty) => v.to_string().to_sql(ty, out),
                    _ => wrong_type(ty),
                },
                Value::Text(s) => match *ty {
                    _ if is_temporal(ty) => {
                        let Some(ts) = temporal::parse_timestamp(s) else {
                            return Err(format!("invalid timestamp literal: {s:?}").into());
                        };
                        Value::Timestamp(ts).to_sql(ty, out)
                    }
                    _ if is_json(ty) => {
                        let json = serde_json::from_str::<serde_json::Value>(s)
                            .unwrap_or_else(|_| serde_json::Value::String(s.clone()));
                        json.to_sql(ty, out)
                    }
                    _ if is_text(ty) => s.to_sql(ty, out),
                    _ => wrong_type(ty),
                },
                Value::Json(v) => match *ty {
                    _ if is_json(ty) => v.to_sql(ty, out),
                    _ if is_text(ty) => v.to_string().to_sql(ty, out),
                    _ => wrong_type(ty),
                },
                Value::Timestamp(ts) => match *ty {
                    Type::TIMESTAMPTZ => ts.to_sql(ty, out),
                    Type::TIMESTAMP => ts.naive_utc().to_sql(ty, out),
                    Type::DATE => ts.date_naive().to_sql(ty, out),
                    _ if is_text(ty) => ts.to_rfc3339_opts(SecondsFormat::Secs, true).to_sql(ty, out),
                    _ => wrong_type(ty),
                },
            }
        }

        fn accepts(ty: &Type) -> bool {
            matches!(
                *ty,
                Type::BOOL | Type::INT2 | Type::INT4 | Type::INT8 | Type::FLOAT4 | Type::FLOAT8
            ) || is_text(ty)
                || is_json(ty)
                || is_temporal(ty)
        }

        // NULL binds to a parameter of any type.
        fn to_sql_checked(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
            if self.is_null() {
                return Ok(IsNull::Yes);
            }
            if !<Self as ToSql>::accepts(ty) {
                return wrong_type(ty);
            }
            self.to_sql(ty, out)
        }
    }

}
