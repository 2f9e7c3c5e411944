//! Connection configuration models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Database type enumeration.
///
/// Only `sqlite` is backed by the embedded engine; the other types are
/// accepted by the connection form but simulated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB analytical database.
    Duckdb,
    /// MySQL database.
    Mysql,
    /// PostgreSQL database.
    Postgresql,
    /// SQLite database (the embedded engine).
    Sqlite,
}

impl DbType {
    /// Returns the default port for this database type.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            DbType::Mysql => Some(3306),
            DbType::Postgresql => Some(5432),
            DbType::Duckdb | DbType::Sqlite => None,
        }
    }

    /// Whether this type is served by the embedded engine.
    pub fn is_embedded(&self) -> bool {
        matches!(self, DbType::Sqlite)
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::Duckdb => write!(f, "duckdb"),
            DbType::Mysql => write!(f, "mysql"),
            DbType::Postgresql => write!(f, "postgresql"),
            DbType::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Connection form data for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionConfig {
    /// Database type.
    pub db_type: DbType,
    /// Database host (empty for embedded engines).
    #[serde(default)]
    pub host: String,
    /// Database port (empty for embedded engines).
    #[serde(default)]
    pub port: String,
    /// Database username.
    #[serde(default)]
    pub user: String,
    /// Database password.
    #[serde(default)]
    pub password: String,
    /// Database name or file path; `:memory:` selects the in-memory engine.
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::Sqlite,
            host: String::new(),
            port: String::new(),
            user: String::new(),
            password: String::new(),
            database: ":memory:".to_string(),
        }
    }
}
