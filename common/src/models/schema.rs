//! Schema catalog models.
//!
//! The catalog is introspected from the live connection: a list of
//! databases, each wrapping its tables and their columns in definition
//! order. In this system exactly one database (`"main"`) is ever populated.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A column in a database table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared column type (verbatim engine type string).
    #[serde(rename = "type")]
    pub data_type: String,
}

/// A database table with its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in table-definition order.
    pub columns: Vec<Column>,
}

/// A database with its tables in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Database {
    /// Database name.
    pub name: String,
    /// Tables in discovery order.
    pub tables: Vec<Table>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
        }
    }
}
