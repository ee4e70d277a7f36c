use super::*;
use crate::dialect::{DialectKind, MySql, Postgres};

fn car_insert(dialect: DialectKind) -> InsertQueryBuilder {
    let mut qb = InsertQueryBuilder::new(dialect);
    qb.set_table_prefix("db1_")
        .set_table_name("cars")
        .add_column_name("car_name")
        .append_value_list(["hello"]);
    qb
}

// ==================== INSERT ====================

#[test]
fn test_mysql_single_column_insert() {
    let built = car_insert(DialectKind::MySql).build().unwrap();
    assert_eq!(built.sql, "INSERT INTO ?? (??) VALUES (?)");
    assert_eq!(
        built.values,
        vec![Value::from("db1_cars"), Value::from("car_name"), Value::from("hello")]
    );
}

#[test]
fn test_postgres_insert_appends_returning() {
    let mysql = car_insert(DialectKind::MySql).build_query_string().unwrap();
    let pg = car_insert(DialectKind::Postgres).build_query_string().unwrap();
    assert!(!mysql.contains("RETURNING"));
    assert!(pg.ends_with(" RETURNING *"));
}

#[test]
fn test_mysql_values_are_table_then_columns_then_values() {
    let columns = ["a", "b", "c", "d"];
    let mut qb = InsertQueryBuilder::mysql();
    qb.set_table_name("t").add_column_names(columns).append_value_list([1, 2, 3, 4]);

    let values = qb.build_query_values().unwrap();
    assert_eq!(values.len(), 1 + columns.len() + columns.len());
    assert_eq!(values[0], Value::from("t"));
    assert_eq!(values[1..5], columns.map(Value::from));
    assert_eq!(values[5..], [1, 2, 3, 4].map(Value::from));
}

#[test]
fn test_build_is_idempotent() {
    let qb = car_insert(DialectKind::Postgres);
    assert_eq!(qb.build_query_string().unwrap(), qb.build_query_string().unwrap());
    assert_eq!(qb.build_query_values().unwrap(), qb.build_query_values().unwrap());
    assert_eq!(qb.build().unwrap(), qb.build().unwrap());
}

#[test]
fn test_mysql_multi_row_insert_values_in_group_order() {
    let mut qb = InsertQueryBuilder::mysql();
    qb.set_table_name("cars").add_column_names(["make", "year"]);
    for (make, year) in [("audi", 2001), ("bmw", 2002)] {
        let mut row = ExpressionListBuilder::comma_separated(MySql);
        row.set_param(make).set_param(year);
        qb.append_value_list_using_query_builder(&row).unwrap();
    }

    let built = qb.build().unwrap();
    assert_eq!(built.sql, "INSERT INTO ?? (??, ??) VALUES (?, ?), (?, ?)");
    assert_eq!(
        &built.values[3..],
        &[
            Value::from("audi"),
            Value::Int(2001),
            Value::from("bmw"),
            Value::Int(2002)
        ]
    );
}

#[test]
fn test_timestamp_and_json_values_in_insert() {
    let mut row = ExpressionListBuilder::comma_separated(Postgres);
    row.set_param_from_timestamp_string("2023-04-04T14:58:59Z")
        .set_param_from_json(serde_json::json!({"tags": ["a"]}));

    let mut qb = InsertQueryBuilder::postgres();
    qb.set_table_name("events")
        .add_column_names(["happened_at", "payload"])
        .append_value_list_using_query_builder(&row)
        .unwrap();

    let built = qb.build().unwrap();
    assert_eq!(
        built.sql,
        r#"INSERT INTO "events" ("happened_at", "payload") VALUES ($1::timestamptz, $2) RETURNING *"#
    );
    assert_eq!(built.values[0], Value::from("2023-04-04T14:58:59Z"));
    assert_eq!(built.values[1], Value::Json(serde_json::json!({"tags": ["a"]})));
}

// ==================== UPDATE ====================

#[test]
fn test_mysql_update_with_timestamp_assignment_and_where() {
    let mut set = ExpressionListBuilder::comma_separated(MySql);
    set.set_assignment_with_param_as_timestamp("updated_at", "2023-04-04T14:58:59Z");

    let mut filter = ExpressionListBuilder::and_separated(MySql);
    filter.set_assignment_with_param("id", 10);

    let mut qb = UpdateQueryBuilder::mysql();
    qb.set_table_name("cars")
        .append_set_list_using_query_builder(&set)
        .set_where_from_query_builder(filter);

    let built = qb.build().unwrap();
    assert_eq!(
        built.sql,
        "UPDATE ?? SET ?? = DATE_FORMAT(?, '%Y-%m-%d %H:%i:%s') WHERE ?? = ?"
    );
    assert_eq!(
        built.values,
        vec![
            Value::from("cars"),
            Value::from("updated_at"),
            Value::from("2023-04-04 14:58:59"),
            Value::from("id"),
            Value::Int(10),
        ]
    );
}

#[test]
fn test_postgres_update_where_ordinals_follow_set() {
    let mut set = ExpressionListBuilder::comma_separated(Postgres);
    set.set_assignment_with_param_as_timestamp("updated_at", "2023-04-04T14:58:59Z")
        .set_assignment_with_param_as_json("meta", serde_json::json!({"v": 2}));

    let mut filter = ExpressionListBuilder::and_separated(Postgres);
    filter.set_assignment_with_param("id", 10);

    let mut qb = UpdateQueryBuilder::postgres();
    qb.set_table_name("cars")
        .append_set_list_using_query_builder(&set)
        .set_where_from_query_builder(filter);

    assert_eq!(
        qb.build_query_string().unwrap(),
        r#"UPDATE "cars" SET "updated_at" = $1::timestamptz, "meta" = $2 WHERE "id" = $3 RETURNING *"#
    );
    assert_eq!(qb.build_query_values().unwrap()[2], Value::Int(10));
}

#[test]
fn test_query_value_factories_match_values() {
    let mut set = ExpressionListBuilder::comma_separated(Postgres);
    set.set_param_factory(|| Value::Int(3));
    let factories = set.query_value_factories().unwrap();
    assert_eq!(factories.len(), 1);
    assert!(factories[0].is_deferred());
    assert_eq!(factories[0].produce(), Value::Int(3));
}

// ==================== Display ====================

#[test]
fn test_built_query_display() {
    let built = car_insert(DialectKind::MySql).build().unwrap();
    assert_eq!(
        built.to_string(),
        "INSERT INTO ?? (??) VALUES (?) -- ['db1_cars', 'car_name', 'hello']"
    );
    assert_eq!(built.len(), 3);
    let (sql, values) = built.into_parts();
    assert!(sql.starts_with("INSERT"));
    assert_eq!(values.len(), 3);
}

#[test]
fn test_returning_is_ignored_by_mysql() {
    let mut qb = car_insert(DialectKind::MySql);
    qb.returning("id");
    assert_eq!(qb.build_query_string().unwrap(), "INSERT INTO ?? (??) VALUES (?)");
}

#[cfg(feature = "postgres")]
#[test]
fn test_params_ref_has_one_entry_per_value() {
    let built = car_insert(DialectKind::Postgres).build().unwrap();
    assert_eq!(built.params_ref().len(), built.len());
}
