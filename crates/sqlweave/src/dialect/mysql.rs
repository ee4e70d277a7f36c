use super::{Dialect, DialectKind, Renderer};
use crate::ident::Ident;
use crate::temporal::{self, MYSQL_DATE_FORMAT_PATTERN};
use crate::value::{Value, ValueFactory};

/// MySQL / MariaDB: `?` values, `??` identifiers, conversions done client side.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

const IDENT_PLACEHOLDER: &str = "??";

fn identifier_value(ident: &Ident) -> ValueFactory {
    ValueFactory::bound(ident.dotted())
}

fn to_json_text(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => Value::Text(other.to_json().to_string()),
    }
}

impl Dialect for MySql {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn value_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn render_identifier(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_bind_token(IDENT_PLACEHOLDER, identifier_value(ident));
    }

    fn render_identifier_as_text(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_sql("CAST(")
            .push_bind_token(IDENT_PLACEHOLDER, identifier_value(ident))
            .push_sql(" AS CHAR)");
    }

    fn render_identifier_as_timestamp_string(&self, ident: &Ident, out: &mut Renderer<'_>) {
        out.push_sql("DATE_FORMAT(")
            .push_bind_token(IDENT_PLACEHOLDER, identifier_value(ident))
            .push_sql(", '%Y-%m-%dT%H:%i:%sZ')");
    }

    fn render_param_as_text(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_sql("CAST(").push_bind(value).push_sql(" AS CHAR)");
    }

    fn render_timestamp_param(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_bind(value.map(temporal::to_mysql_datetime));
    }

    fn render_json_param(&self, value: ValueFactory, out: &mut Renderer<'_>) {
        out.push_bind(value.map(to_json_text));
    }

    fn render_timestamp_assignment(&self, column: &Ident, value: ValueFactory, out: &mut Renderer<'_>) {
        self.render_identifier(column, out);
        out.push_sql(" = DATE_FORMAT(")
            .push_bind(value.map(temporal::to_mysql_datetime))
            .push_sql(", '")
            .push_sql(MYSQL_DATE_FORMAT_PATTERN)
            .push_sql("')");
    }

    fn query_suffix(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Fragment, Piece};

    fn render(piece: Piece) -> (String, Vec<Value>) {
        let (sql, factories) = Fragment::piece(piece).render(&MySql).unwrap();
        (sql, factories.iter().map(ValueFactory::produce).collect())
    }

    #[test]
    fn identifiers_are_bound_not_inlined() {
        let (sql, values) = render(Piece::Ident(Ident::parse("cars.car_name")));
        assert_eq!(sql, "??");
        assert_eq!(values, vec![Value::Text("cars.car_name".into())]);
    }

    #[test]
    fn timestamp_assignment_wraps_converted_value() {
        let (sql, values) = render(Piece::TimestampAssignment {
            column: Ident::single("updated_at"),
            value: ValueFactory::bound("2023-04-04T14:58:59Z"),
        });
        assert_eq!(sql, "?? = DATE_FORMAT(?, '%Y-%m-%d %H:%i:%s')");
        assert_eq!(
            values,
            vec![
                Value::Text("updated_at".into()),
                Value::Text("2023-04-04 14:58:59".into())
            ]
        );
    }

    #[test]
    fn json_is_serialized_locally() {
        let (sql, values) = render(Piece::JsonParam(ValueFactory::bound(serde_json::json!({"a": [1, 2]}))));
        assert_eq!(sql, "?");
        assert_eq!(values, vec![Value::Text(r#"{"a":[1,2]}"#.into())]);

        let (_, values) = render(Piece::JsonParam(ValueFactory::bound(Value::Null)));
        assert_eq!(values, vec![Value::Null]);
    }

    #[test]
    fn text_casts() {
        let (sql, _) = render(Piece::ParamAsText(ValueFactory::bound(5)));
        assert_eq!(sql, "CAST(? AS CHAR)");
        let (sql, _) = render(Piece::IdentAsText(Ident::single("id")));
        assert_eq!(sql, "CAST(?? AS CHAR)");
    }

    #[test]
    fn no_suffix() {
        assert!(MySql.query_suffix().is_none());
        assert!(MySql.returning_clause("id").is_none());
    }
}
