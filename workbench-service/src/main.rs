//! Orbit workbench service.
//!
//! Backend for the database workbench: users connect to a database,
//! browse the schema, write or generate SQL, execute it, and view
//! tabular or ER-diagram results. Provides:
//! - natural-language and raw SQL query resolution and execution
//! - schema catalog introspection of the embedded engine
//! - entity-relationship inference for diagram rendering
//! - session history recording with export/import

mod diagram;
mod executor;
mod handlers;
mod recorder;
mod registry;
mod resolver;
mod routes;
mod schema;
mod service;
mod state;

use axum::{middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use service::WorkbenchService;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "workbench-service";
const DEFAULT_PORT: u16 = 8080;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orbit Workbench API",
        version = "0.1.0",
        description = "Database workbench: query resolution and execution, \
                       schema browsing, ER diagrams and session bundles"
    ),
    paths(
        handlers::run_query,
        handlers::get_schema,
        handlers::reload_schema,
        handlers::connect,
        handlers::er_diagram,
        handlers::get_history,
        handlers::export_session,
        handlers::import_session,
        handlers::new_session,
        handlers::get_status,
        handlers::health_check,
    ),
    components(schemas(
        common::models::RunQueryRequest,
        common::models::QueryResult,
        common::models::QueryHistoryItem,
        common::models::ConnectionConfig,
        common::models::DbType,
        common::models::Column,
        common::models::Table,
        common::models::Database,
        common::models::SessionBundle,
        common::models::SessionManifest,
        service::StatusInfo,
        handlers::HealthResponse,
    )),
    tags(
        (name = "query", description = "Query resolution and execution"),
        (name = "schema", description = "Schema catalog and ER diagram"),
        (name = "connection", description = "Connection management"),
        (name = "session", description = "Session history, export and import"),
        (name = "health", description = "Health check endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize logging and tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::load_with_service(SERVICE_NAME, DEFAULT_PORT);

    // Open the embedded engine, seed demo data and load the catalog
    let session = WorkbenchService::initialize()
        .await
        .expect("session initialization failed");

    let state = AppState::new(config.clone(), session);
    let app = create_router(state);

    let addr = config.bind_addr();
    info!(service = SERVICE_NAME, address = %addr, "starting service");

    let listener = TcpListener::bind(&addr).await.expect("failed to bind address");
    axum::serve(listener, app).await.expect("server failed");
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
