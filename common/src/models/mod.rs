//! Shared data models for the workbench.

pub mod connection;
pub mod query;
pub mod schema;
pub mod session;

// Re-export commonly used types
pub use connection::{ConnectionConfig, DbType};
pub use query::{QueryHistoryItem, QueryResult, RunQueryRequest};
pub use schema::{Column, Database, Table};
pub use session::{SessionBundle, SessionManifest};
