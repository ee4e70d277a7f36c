//! Print the same INSERT and UPDATE in both dialects.
//!
//! Run with: `cargo run -p sqlweave --example dialects`

use serde_json::json;
use sqlweave::entity::{ColumnDefinition, EntityField, EntityMapper, TemporalProperty};
use sqlweave::{DialectKind, ExpressionListBuilder, QbResult, QueryBuilder, QueryConfig};

fn main() -> QbResult<()> {
    let fields = vec![
        EntityField::new("id", "id").read_only(),
        EntityField::new("name", "car_name"),
        EntityField::new("producedAt", "produced_at"),
        EntityField::new("specs", "specs").with_column_definition(ColumnDefinition::Json),
    ];
    let mapper = EntityMapper::new(&fields, &[TemporalProperty::timestamp("producedAt")], ["id"]);

    let cars = [
        json!({"name": "golf", "producedAt": "2023-04-04T14:58:59Z", "specs": {"doors": 3}}),
        json!({"name": "polo", "producedAt": "2024-01-02T03:04:05Z", "specs": null}),
    ];

    for dialect in [DialectKind::MySql, DialectKind::Postgres] {
        let config = QueryConfig::new().dialect(dialect).table_prefix("db1_");
        println!("== {dialect} ==");

        let insert = config.insert_entities("cars", &mapper, &cars)?;
        println!("{insert}");

        let mut filter = ExpressionListBuilder::and_separated(dialect);
        filter.set_assignment_with_param("id", 1);
        let mut update = config.update_entity("cars", &mapper, &cars[0]);
        update.set_where_from_query_builder(filter);

        let built = update.build()?;
        println!("{}", built.sql);
        println!("  values: {:?}", built.values);
        println!();
    }

    Ok(())
}
