//! `tracing` events emitted while building statements.
//!
//! Enable via the crate feature: `sqlweave = { features = ["tracing"] }` (on by default).
//! Without the feature every helper here is a no-op.

/// Longest SQL string (in bytes) included in a build event.
#[cfg(feature = "tracing")]
pub(crate) const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn built_query(builder: &'static str, dialect: &'static str, sql: &str, value_count: usize) {
    #[cfg(feature = "tracing")]
    {
        let shown = truncate_sql_bytes(sql, MAX_LOGGED_SQL);
        let truncated = shown.len() < sql.len();
        tracing::debug!(
            target: "sqlweave.build",
            builder,
            dialect,
            value_count,
            truncated,
            sql = %shown,
            "built query"
        );
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (builder, dialect, sql, value_count);
}

pub(crate) fn duplicate_column(builder: &'static str, column: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "sqlweave.build", builder, column, "column already added, skipping");
    #[cfg(not(feature = "tracing"))]
    let _ = (builder, column);
}

pub(crate) fn timestamp_passthrough(raw: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        target: "sqlweave.entity",
        value = raw,
        "unparseable timestamp, binding it unchanged"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = raw;
}

pub(crate) fn mapped_row(statement: &'static str, row: usize, fields: usize) {
    #[cfg(feature = "tracing")]
    tracing::trace!(target: "sqlweave.entity", statement, row, fields, "mapped entity row");
    #[cfg(not(feature = "tracing"))]
    let _ = (statement, row, fields);
}

#[cfg(all(test, feature = "tracing"))]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 200), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT * FROM users", 10), "SELECT * F");
        // 'é' is two bytes; cutting inside it backs off to the previous boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }
}
