//! Application error types.
//!
//! All service boundaries convert underlying engine and I/O errors into
//! `AppError`, which maps onto the unified API response envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::{ApiError, ApiResponse};

/// Result alias used throughout the workbench.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Connecting to the database engine failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Schema introspection failed; no partial catalog is published.
    #[error("schema load failed: {0}")]
    SchemaLoad(String),

    /// The engine rejected a statement or a relation is missing.
    #[error("query execution failed: {0}")]
    Execution(String),

    /// A session bundle could not be parsed or is missing required keys.
    #[error("session import failed: {0}")]
    SessionImport(String),

    /// Request body validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Machine-readable error code for the API envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::SchemaLoad(_) => "SCHEMA_LOAD_ERROR",
            AppError::Execution(_) => "EXECUTION_ERROR",
            AppError::SessionImport(_) => "SESSION_IMPORT_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }

    /// HTTP status code for the API envelope.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Connection(_) => StatusCode::BAD_GATEWAY,
            AppError::SchemaLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Execution(_) => StatusCode::BAD_REQUEST,
            AppError::SessionImport(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::error(ApiError {
            code: self.code().to_string(),
            message: self.to_string(),
            details: None,
        });
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
