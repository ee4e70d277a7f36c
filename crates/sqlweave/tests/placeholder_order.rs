//! The rendered placeholders and the bound values must always line up.

use proptest::prelude::*;
use sqlweave::prelude::*;

#[derive(Debug, Clone)]
enum Cell {
    Plain(i64),
    Text(String),
    Timestamp,
    Json(i64),
}

fn cell() -> impl Strategy<Value = Cell> {
    prop_oneof![
        any::<i64>().prop_map(Cell::Plain),
        "[a-z?$]{0,8}".prop_map(Cell::Text),
        Just(Cell::Timestamp),
        any::<i64>().prop_map(Cell::Json),
    ]
}

fn push_cell(list: &mut ExpressionListBuilder, cell: &Cell) {
    match cell {
        Cell::Plain(v) => list.set_param(*v),
        Cell::Text(s) => list.set_param(s.as_str()),
        Cell::Timestamp => list.set_param_from_timestamp_string("2023-04-04T14:58:59Z"),
        Cell::Json(v) => list.set_param_from_json(serde_json::json!({ "v": v })),
    };
}

fn push_assignment(list: &mut ExpressionListBuilder, column: &str, cell: &Cell) {
    match cell {
        Cell::Plain(v) => list.set_assignment_with_param(column, *v),
        Cell::Text(s) => list.set_assignment_with_param(column, s.as_str()),
        Cell::Timestamp => list.set_assignment_with_param_as_timestamp(column, "2023-04-04T14:58:59Z"),
        Cell::Json(v) => list.set_assignment_with_param_as_json(column, serde_json::json!([v])),
    };
}

/// Number of MySQL placeholders (`?` and `??`) in `sql`.
fn mysql_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'?' {
            count += 1;
            i += if bytes.get(i + 1) == Some(&b'?') { 2 } else { 1 };
        } else {
            i += 1;
        }
    }
    count
}

/// The `$n` ordinals of `sql`, in order of appearance.
fn postgres_ordinals(sql: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut rest = sql;
    while let Some(pos) = rest.find('$') {
        rest = &rest[pos + 1..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(n) = digits.parse() {
            out.push(n);
        }
    }
    out
}

fn insert_with(dialect: DialectKind, columns: usize, rows: &[Vec<Cell>]) -> InsertQueryBuilder {
    let mut qb = sqlweave::insert_into(dialect, "t");
    qb.add_column_names((0..columns).map(|i| format!("c{i}")));
    for row in rows {
        let mut list = ExpressionListBuilder::comma_separated(dialect);
        for cell in row {
            push_cell(&mut list, cell);
        }
        qb.append_value_list_using_query_builder(&list).unwrap();
    }
    qb
}

fn rows_strategy() -> impl Strategy<Value = (usize, Vec<Vec<Cell>>)> {
    (1usize..6).prop_flat_map(|columns| {
        (
            Just(columns),
            prop::collection::vec(prop::collection::vec(cell(), columns), 1..5),
        )
    })
}

proptest! {
    #[test]
    fn mysql_insert_placeholder_count_matches_values((columns, rows) in rows_strategy()) {
        let built = insert_with(DialectKind::MySql, columns, &rows).build().unwrap();
        prop_assert_eq!(mysql_placeholders(&built.sql), built.values.len());
        prop_assert_eq!(built.values.len(), 1 + columns + columns * rows.len());
    }

    #[test]
    fn postgres_insert_ordinals_are_sequential((columns, rows) in rows_strategy()) {
        let built = insert_with(DialectKind::Postgres, columns, &rows).build().unwrap();
        let expected: Vec<usize> = (1..=built.values.len()).collect();
        prop_assert_eq!(postgres_ordinals(&built.sql), expected);
        prop_assert_eq!(built.values.len(), columns * rows.len());
    }

    #[test]
    fn update_where_values_follow_set_values(
        set in prop::collection::vec(cell(), 1..6),
        ids in prop::collection::vec(any::<i64>(), 0..3),
    ) {
        for dialect in [DialectKind::MySql, DialectKind::Postgres] {
            let mut list = ExpressionListBuilder::comma_separated(dialect);
            for (i, cell) in set.iter().enumerate() {
                push_assignment(&mut list, &format!("c{i}"), cell);
            }
            let mut filter = ExpressionListBuilder::and_separated(dialect);
            for (i, id) in ids.iter().enumerate() {
                filter.set_assignment_with_param(format!("k{i}").as_str(), *id);
            }

            let mut qb = sqlweave::update(dialect, "t");
            qb.append_set_list_using_query_builder(&list)
                .set_where_from_query_builder(filter);
            let built = qb.build().unwrap();

            let tail: Vec<Value> = match dialect {
                DialectKind::MySql => {
                    prop_assert_eq!(mysql_placeholders(&built.sql), built.values.len());
                    ids.iter()
                        .enumerate()
                        .flat_map(|(i, id)| [Value::from(format!("k{i}")), Value::Int(*id)])
                        .collect()
                }
                DialectKind::Postgres => {
                    let expected: Vec<usize> = (1..=built.values.len()).collect();
                    prop_assert_eq!(postgres_ordinals(&built.sql), expected);
                    ids.iter().map(|id| Value::Int(*id)).collect()
                }
            };
            prop_assert!(built.values.ends_with(&tail));
            prop_assert_eq!(built.sql.contains(" WHERE "), !ids.is_empty());
        }
    }

    #[test]
    fn repeated_builds_are_identical((columns, rows) in rows_strategy()) {
        let qb = insert_with(DialectKind::Postgres, columns, &rows);
        prop_assert_eq!(qb.build().unwrap(), qb.build().unwrap());
    }
}
