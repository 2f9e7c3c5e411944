//! Session bundle models.
//!
//! A session bundle is the serialized export unit (`.orb` file, JSON):
//! manifest, connection config, schema snapshot and the full query history.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};
use crate::models::connection::ConnectionConfig;
use crate::models::query::QueryHistoryItem;
use crate::models::schema::Database;

/// Bundle format version written by this implementation.
pub const BUNDLE_VERSION: &str = "1.0";

/// Bundle metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionManifest {
    /// Bundle format version.
    pub version: String,
    /// RFC 3339 UTC creation timestamp.
    pub created: String,
    /// Human-readable session title.
    pub title: String,
}

/// Serialized session: manifest, connection, schema snapshot and history.
///
/// `manifest` and `query_history` are required on import; the optional
/// sections replace the corresponding state only when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionBundle {
    /// Bundle metadata.
    pub manifest: SessionManifest,
    /// Connection form data at export time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionConfig>,
    /// Schema catalog at export time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_snapshot: Option<Vec<Database>>,
    /// Full query history, oldest first.
    pub query_history: Vec<QueryHistoryItem>,
}

impl SessionBundle {
    /// Parses a bundle from raw JSON bytes.
    ///
    /// # Errors
    /// Returns `AppError::SessionImport` when the payload is not valid JSON
    /// or required keys are missing. Callers must not mutate any state
    /// before this succeeds.
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| AppError::SessionImport(e.to_string()))
    }
}
