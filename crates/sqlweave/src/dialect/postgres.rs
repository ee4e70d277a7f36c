use super::{Dialect, DialectKind, Renderer};
use crate::ident::Ident;
use crate::value::{Value, ValueFactory};

/// PostgreSQL: `$n` values, quoted identifiers, server-side casts, `RETURNING *`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

const TIMESTAMP_CAST: &str = "::timestamptz";

fn to_json_value(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Json(v) => Value::Json(v),
        other => Value::Json(other.to_json()),
    }
}

impl Dialect for Postgres {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn value_placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn render_identifier(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_sql(&ident.to_quoted());
    }

    fn render_identifier_as_text(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_sql(&ident.to_quoted()).push_sql("::text");
    }

    fn render_identifier_as_timestamp_string(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_sql("to_char(")
            .push_sql(&ident.to_quoted())
            .push_sql(r#", 'YYYY-MM-DD"T"HH24:MI:SS"Z"')"#);
    }

    fn render_param_as_text(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_bind(value).push_sql("::text");
    }

    fn render_timestamp_param(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_bind(value).push_sql(TIMESTAMP_CAST);
    }

    fn render_json_param(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_bind(value.map(to_json_value));
    }

    fn render_timestamp_assignment(&self, column: &Ident, value: ValueFactory, out: &mut Renderer<'_>) {
        self.render_identifier(column, out);
        out.push_sql(" = ");
        self.render_timestamp_param(value, out);
    }

    fn query_suffix(&self) -> Option<&'static str> {
        Some(" RETURNING *")
    }

    fn returning_clause(&self, columns: &str) -> Option<String> {
        Some(format!(" RETURNING {columns}"))
    }
}
