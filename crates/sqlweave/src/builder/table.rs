use crate::error::{QbError, QbResult};
use crate::ident::Ident;

/// The table an INSERT or UPDATE writes to.
///
/// The effective name is `prefix + name`, optionally qualified by a schema (or MySQL
/// database). The name is required; the prefix defaults to empty.
///
/// # Example
///
/// ```rust
/// use sqlweave::builder::TableTarget;
///
/// let mut table = TableTarget::new();
/// table.set_name("cars").set_prefix("db1_").set_schema("inventory");
/// assert_eq!(table.full_name("example").unwrap(), "db1_cars");
/// assert_eq!(table.complete_name("example").unwrap(), "inventory.db1_cars");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableTarget {
    name: Option<String>,
    prefix: String,
    schema: Option<String>,
}

impl TableTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.prefix = prefix.into();
        self
    }

    pub fn set_schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// `prefix + name`. Fails if no name was set.
    pub fn full_name(&self, builder: &'static str) -> QbResult<String> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| QbError::missing_table_name(builder))?;
        Ok(format!("{}{}", self.prefix, name))
    }

    /// The schema-qualified identifier of the table.
    pub fn complete_ident(&self, builder: &'static str) -> QbResult<Ident> {
        let full = self.full_name(builder)?;
        Ok(match &self.schema {
            Some(schema) => Ident::from_parts([schema.clone(), full]),
            None => Ident::single(full),
        })
    }

    /// The schema-qualified table name in dotted form.
    pub fn complete_name(&self, builder: &'static str) -> QbResult<String> {
        Ok(self.complete_ident(builder)?.dotted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_requires_name() {
        let mut table = TableTarget::new();
        table.set_prefix("db1_");
        let err = table.full_name("InsertQueryBuilder").unwrap_err();
        assert!(err.is_missing_table_name());
        assert_eq!(err.to_string(), "InsertQueryBuilder: table name has not been set");
    }

    #[test]
    fn complete_name_without_schema_is_full_name() {
        let mut table = TableTarget::new();
        table.set_name("cars");
        assert_eq!(table.full_name("t").unwrap(), "cars");
        assert_eq!(table.complete_ident("t").unwrap(), Ident::single("cars"));
    }
}
