//! HTTP handlers for the workbench endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use common::errors::AppError;
use common::models::{
    ConnectionConfig, Database, QueryHistoryItem, RunQueryRequest, SessionBundle,
};
use common::response::ApiResponse;

use crate::service::{StatusInfo, WorkbenchService};
use crate::state::AppState;

const SERVICE_NAME: &str = "workbench-service";

/// Resolves and executes a query.
///
/// `data` is `null` when a query was already in flight and the request
/// was dropped.
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "query",
    request_body = RunQueryRequest,
    responses(
        (status = 200, description = "Query attempt recorded (or dropped)", body = ApiResponse<QueryHistoryItem>),
        (status = 400, description = "Empty query input")
    )
)]
pub async fn run_query(
    State(state): State<AppState>,
    Json(req): Json<RunQueryRequest>,
) -> Result<Json<ApiResponse<Option<QueryHistoryItem>>>, AppError> {
    req.validate()?;
    let entry = state.service.run_query(&req.input).await;
    Ok(Json(ApiResponse::ok_with_service(entry, SERVICE_NAME)))
}

/// Returns the published schema catalog.
#[utoipa::path(
    get,
    path = "/api/schema",
    tag = "schema",
    responses(
        (status = 200, description = "Current catalog", body = ApiResponse<Vec<Database>>)
    )
)]
pub async fn get_schema(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<Database>>> {
    Json(ApiResponse::ok_with_service(
        state.service.catalog().await,
        SERVICE_NAME,
    ))
}

/// Re-introspects the current connection.
#[utoipa::path(
    post,
    path = "/api/schema/reload",
    tag = "schema",
    responses(
        (status = 200, description = "Catalog reloaded", body = ApiResponse<Vec<Database>>),
        (status = 500, description = "Introspection failed")
    )
)]
pub async fn reload_schema(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Database>>>, AppError> {
    let catalog = state.service.load_schema().await?;
    Ok(Json(ApiResponse::ok_with_service(catalog, SERVICE_NAME)))
}

/// Connects to a database using the form data.
///
/// Only the embedded engine performs a real connection; other types are
/// simulated with a status message.
#[utoipa::path(
    post,
    path = "/api/connection",
    tag = "connection",
    request_body = ConnectionConfig,
    responses(
        (status = 200, description = "Connected (or simulated)", body = ApiResponse<String>),
        (status = 502, description = "Connection failed")
    )
)]
pub async fn connect(
    State(state): State<AppState>,
    Json(config): Json<ConnectionConfig>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let status = state.service.connect(config).await?;
    Ok(Json(ApiResponse::ok_with_service(status, SERVICE_NAME)))
}

/// Returns the ER diagram source for the active database.
#[utoipa::path(
    get,
    path = "/api/diagram",
    tag = "schema",
    responses(
        (status = 200, description = "Mermaid erDiagram source", body = ApiResponse<String>)
    )
)]
pub async fn er_diagram(State(state): State<AppState>) -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok_with_service(
        state.service.er_diagram().await,
        SERVICE_NAME,
    ))
}

/// Returns the query history, oldest first.
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "session",
    responses(
        (status = 200, description = "Query history", body = ApiResponse<Vec<QueryHistoryItem>>)
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<QueryHistoryItem>>> {
    Json(ApiResponse::ok_with_service(
        state.service.history().await,
        SERVICE_NAME,
    ))
}

/// Exports the session as a downloadable `.orb` bundle.
#[utoipa::path(
    get,
    path = "/api/session/export",
    tag = "session",
    responses(
        (status = 200, description = "Session bundle attachment", body = SessionBundle)
    )
)]
pub async fn export_session(State(state): State<AppState>) -> impl IntoResponse {
    let bundle = state.service.export_session().await;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        WorkbenchService::export_filename()
    );
    ([(header::CONTENT_DISPOSITION, disposition)], Json(bundle))
}

/// Imports an uploaded session bundle, replacing the session wholesale.
#[utoipa::path(
    post,
    path = "/api/session/import",
    tag = "session",
    request_body = SessionBundle,
    responses(
        (status = 200, description = "Session imported", body = ApiResponse<String>),
        (status = 422, description = "Malformed bundle; state unchanged")
    )
)]
pub async fn import_session(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let status = state.service.import_session(&payload).await?;
    Ok(Json(ApiResponse::ok_with_service(status, SERVICE_NAME)))
}

/// Starts a new session, clearing the history.
#[utoipa::path(
    post,
    path = "/api/session/new",
    tag = "session",
    responses(
        (status = 200, description = "Session cleared", body = ApiResponse<String>)
    )
)]
pub async fn new_session(State(state): State<AppState>) -> Json<ApiResponse<String>> {
    state.service.new_session().await;
    Json(ApiResponse::ok_with_service(
        "New session started.".to_string(),
        SERVICE_NAME,
    ))
}

/// Returns the status bar data.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "session",
    responses(
        (status = 200, description = "Status text and last query duration", body = ApiResponse<StatusInfo>)
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Json<ApiResponse<StatusInfo>> {
    Json(ApiResponse::ok_with_service(
        state.service.status_info().await,
        SERVICE_NAME,
    ))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
