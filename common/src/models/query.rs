//! Query models.
//!
//! Contains the tabular query result and the per-execution history entry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for running a query.
///
/// The input is either a natural-language pseudo-call of the form
/// `output("...")` or a raw SQL statement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RunQueryRequest {
    /// Query text as typed by the user.
    #[validate(length(min = 1, message = "Query input is required"))]
    pub input: String,
}

/// Tabular result of a query execution.
///
/// Every row has exactly `columns.len()` cells; cells are restricted to
/// string, integer, float, boolean or null values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryResult {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// Row data (each row is a vector of scalar JSON values).
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Creates an empty result.
    pub fn empty() -> Self {
        Self {
            columns: vec![],
            rows: vec![],
        }
    }

    /// Creates a one-row error result displayed in place of real data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            columns: vec!["Error".to_string()],
            rows: vec![vec![serde_json::Value::String(message.into())]],
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One executed query in the session history.
///
/// Created once per execution and never mutated afterwards; history is
/// append-only, most-recent-last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryHistoryItem {
    /// Unique entry identifier (UUID).
    pub id: String,
    /// Raw user input, exactly as typed.
    pub natural_language: String,
    /// SQL produced by the resolver (or passed through).
    pub generated_sql: String,
    /// Materialized results (or the one-row error result).
    pub results: QueryResult,
    /// Wall-clock duration of the attempt in seconds, 2-decimal rounded.
    pub execution_time: f64,
    /// RFC 3339 UTC timestamp of the execution.
    pub timestamp: String,
}
