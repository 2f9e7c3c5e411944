//! Route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/query", post(handlers::run_query))
        .route("/api/schema", get(handlers::get_schema))
        .route("/api/schema/reload", post(handlers::reload_schema))
        .route("/api/connection", post(handlers::connect))
        .route("/api/diagram", get(handlers::er_diagram))
        .route("/api/history", get(handlers::get_history))
        .route("/api/session/export", get(handlers::export_session))
        .route("/api/session/import", post(handlers::import_session))
        .route("/api/session/new", post(handlers::new_session))
        .route("/api/status", get(handlers::get_status))
        .route("/api/health", get(handlers::health_check))
}
