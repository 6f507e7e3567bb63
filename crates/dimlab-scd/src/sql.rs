//! Rendering of the warehouse statements a strategy corresponds to.
//!
//! These are pure formatting helpers for the presentation layer: the engine
//! never executes SQL, it only shows the statement a real pipeline would run
//! for the same update. Keep them stateless and test them against literal
//! expected text.

use chrono::NaiveDate;

use crate::apply::ScdStrategy;

/// Column/table names used when rendering statements.
///
/// Names are rendered verbatim; warehouse-style fixtures pass them uppercase
/// (`DIM_CUSTOMER`, `LOCATION`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementContext<'a> {
    /// Dimension table name, e.g. `DIM_CUSTOMER`.
    pub table: &'a str,
    /// Staging stream name, e.g. `STREAM_CUSTOMER`.
    pub stream: &'a str,
    /// Business key column, e.g. `CUSTOMER_ID`.
    pub business_key_column: &'a str,
    /// Tracked attribute column, e.g. `LOCATION`.
    pub tracked_column: &'a str,
    /// Prior-value column used by Type 3, e.g. `PREV_LOCATION`.
    pub prior_column: &'a str,
}

/// Render the update statement for `strategy`.
pub fn render_statement(strategy: ScdStrategy, ctx: &StatementContext<'_>) -> String {
    let StatementContext {
        table,
        stream,
        business_key_column: key,
        tracked_column: col,
        prior_column: prior,
    } = *ctx;

    match strategy {
        ScdStrategy::Type1Overwrite => format!(
            "MERGE INTO {table} T\n\
             USING {stream} S\n\
             ON T.{key} = S.{key}\n\
             WHEN MATCHED AND T.HASH <> S.HASH THEN\n\
             \x20 UPDATE SET T.{col} = S.{col},\n\
             \x20            T.HASH = S.HASH;"
        ),
        ScdStrategy::Type2NewVersion => format!(
            "-- 1. Close current record\n\
             UPDATE {table} SET END_DATE = CURRENT_DATE(), CURRENT_FLAG = FALSE\n\
             WHERE {key} = :{key} AND CURRENT_FLAG = TRUE;\n\
             \n\
             -- 2. Insert new record\n\
             INSERT INTO {table} ({key}, {col}, START_DATE, CURRENT_FLAG)\n\
             VALUES (:{key}, :{col}, CURRENT_DATE(), TRUE);"
        ),
        ScdStrategy::Type3PriorValue => format!(
            "MERGE INTO {table} T\n\
             USING {stream} S\n\
             ON T.{key} = S.{key}\n\
             WHEN MATCHED AND T.HASH <> S.HASH THEN\n\
             \x20 UPDATE SET T.{prior} = T.{col},\n\
             \x20            T.{col} = S.{col},\n\
             \x20            T.HASH = S.HASH;"
        ),
    }
}

/// Render the point-in-time predicate for an as-of query.
///
/// The interval is half-open, matching the engine: a row whose `END_DATE`
/// equals the as-of date is already superseded.
pub fn render_as_of_predicate(date: NaiveDate) -> String {
    format!(
        "WHERE START_DATE <= '{date}' AND (END_DATE > '{date}' OR END_DATE IS NULL)",
        date = date.format("%Y-%m-%d")
    )
}
