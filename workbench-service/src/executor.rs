//! Query executor.
//!
//! Runs a resolved SQL statement against the embedded engine and
//! materializes the full result eagerly (no cursor streaming). Engine
//! failures surface as `AppError::Execution`; the service layer converts
//! them into a one-row error result so callers only ever see data.

use common::errors::{AppError, AppResult};
use common::models::QueryResult;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, SqlitePool, Statement, TypeInfo, ValueRef};

/// Executes a statement and materializes all rows and column names.
///
/// Column names come from the prepared statement metadata, so a query
/// returning zero rows still reports its real columns.
///
/// # Errors
/// Returns `AppError::Execution` wrapping the engine message when the
/// statement is malformed, a relation is missing, or a cell fails to
/// decode.
pub async fn execute(pool: &SqlitePool, sql: &str) -> AppResult<QueryResult> {
    let statement = pool
        .prepare(sql)
        .await
        .map_err(|e| AppError::Execution(e.to_string()))?;

    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let rows = statement
        .query()
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::Execution(e.to_string()))?;

    let mut materialized = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut cells = Vec::with_capacity(columns.len());
        for idx in 0..row.columns().len() {
            cells.push(decode_cell(row, idx).map_err(|e| AppError::Execution(e.to_string()))?);
        }
        materialized.push(cells);
    }

    Ok(QueryResult {
        columns,
        rows: materialized,
    })
}

/// Decodes one cell into a scalar JSON value by SQLite storage class.
fn decode_cell(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => Value::from(row.try_get::<f64, _>(idx)?),
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(idx)?),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(idx)?;
            Value::from(format!("<{} bytes>", bytes.len()))
        }
        _ => Value::from(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}
