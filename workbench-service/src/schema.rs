//! Schema loader.
//!
//! Introspects the current connection and produces the catalog: one
//! database named `"main"` wrapping all user tables in definition order,
//! each with its columns in declaration order. Loading is all-or-nothing;
//! on any failure no partial catalog is produced.

use common::errors::{AppError, AppResult};
use common::models::{Column, Database, Table};
use sqlx::{Row, SqlitePool};

/// Name of the single database exposed by the embedded engine.
pub const MAIN_DATABASE: &str = "main";

/// Loads the full schema catalog from the connection.
///
/// # Errors
/// Returns `AppError::SchemaLoad` when table enumeration or column
/// introspection fails.
pub async fn load(pool: &SqlitePool) -> AppResult<Vec<Database>> {
    let table_rows = sqlx::query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY rowid",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::SchemaLoad(e.to_string()))?;

    let mut tables = Vec::with_capacity(table_rows.len());
    for row in &table_rows {
        let table_name: String = row
            .try_get("name")
            .map_err(|e| AppError::SchemaLoad(e.to_string()))?;
        let columns = load_columns(pool, &table_name).await?;
        tables.push(Table {
            name: table_name,
            columns,
        });
    }

    Ok(vec![Database {
        name: MAIN_DATABASE.to_string(),
        tables,
    }])
}

/// Introspects one table's columns in declaration order.
async fn load_columns(pool: &SqlitePool, table_name: &str) -> AppResult<Vec<Column>> {
    // PRAGMA arguments cannot be bound; the name comes from sqlite_master
    // and is quoted here.
    let pragma = format!("PRAGMA table_info('{}')", table_name.replace('\'', "''"));
    let rows = sqlx::query(&pragma)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::SchemaLoad(e.to_string()))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row
            .try_get("name")
            .map_err(|e| AppError::SchemaLoad(e.to_string()))?;
        let data_type: String = row
            .try_get("type")
            .map_err(|e| AppError::SchemaLoad(e.to_string()))?;
        columns.push(Column { name, data_type });
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_catalog_wraps_tables_in_main() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE users (id INTEGER, name TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE products (product_id INTEGER, price REAL)")
            .execute(&pool)
            .await
            .unwrap();

        let catalog = load(&pool).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, MAIN_DATABASE);
        let names: Vec<&str> = catalog[0].tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "products"]);
    }

    #[tokio::test]
    async fn test_columns_in_declaration_order() {
        let pool = memory_pool().await;
        sqlx::query("CREATE TABLE t (z TEXT, a INTEGER, m REAL)")
            .execute(&pool)
            .await
            .unwrap();

        let catalog = load(&pool).await.unwrap();
        let columns = &catalog[0].tables[0].columns;
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(columns[1].data_type, "INTEGER");
    }

    #[tokio::test]
    async fn test_empty_engine_yields_empty_main() {
        let pool = memory_pool().await;
        let catalog = load(&pool).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog[0].tables.is_empty());
    }
}
