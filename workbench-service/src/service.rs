//! Workbench session service.
//!
//! Session-scoped context object owning all shared state: the connection
//! registry, the published schema catalog, the active selection, the query
//! history and the status text. Handlers never touch state directly; every
//! mutation goes through a method here, and locks are held only for the
//! duration of the mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use common::errors::AppResult;
use common::models::session::BUNDLE_VERSION;
use common::models::{
    ConnectionConfig, Database, QueryHistoryItem, QueryResult, SessionBundle, SessionManifest,
};
use common::utils::IdGenerator;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::recorder::SessionRecorder;
use crate::registry::{self, ConnectOutcome, ConnectionRegistry};
use crate::{diagram, executor, resolver, schema};

/// Session title written into exported bundles.
const SESSION_TITLE: &str = "Orbit Session";

/// Active sidebar selection.
#[derive(Default)]
struct Selection {
    active_db: Option<String>,
    active_table: Option<String>,
}

/// Status bar data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusInfo {
    /// Human-readable status line.
    pub status_text: String,
    /// Duration of the last executed query in seconds.
    pub last_query_time: f64,
}

/// The workbench session context.
pub struct WorkbenchService {
    registry: ConnectionRegistry,
    recorder: SessionRecorder,
    catalog: RwLock<Vec<Database>>,
    connection: RwLock<ConnectionConfig>,
    selection: RwLock<Selection>,
    status: RwLock<String>,
    running: AtomicBool,
}

impl WorkbenchService {
    /// Opens the in-memory engine, seeds the demo dataset and loads the
    /// initial catalog.
    pub async fn initialize() -> AppResult<Self> {
        let registry = ConnectionRegistry::open_in_memory().await?;
        let pool = registry.current().await;
        registry::seed_demo_data(&pool).await?;

        let service = Self {
            registry,
            recorder: SessionRecorder::new(),
            catalog: RwLock::new(vec![]),
            connection: RwLock::new(ConnectionConfig::default()),
            selection: RwLock::new(Selection::default()),
            status: RwLock::new("Not Connected".to_string()),
            running: AtomicBool::new(false),
        };
        service.load_schema().await?;
        service.set_status("Connected to in-memory SQLite").await;
        info!("workbench session initialized");
        Ok(service)
    }

    /// Resolves and executes one query, recording the attempt.
    ///
    /// At most one execution is in flight at a time; a call while one is
    /// already running is silently dropped and returns `None`. Execution
    /// failures are data from the caller's perspective: they come back as
    /// a one-row error result inside the recorded entry.
    pub async fn run_query(&self, input: &str) -> Option<QueryHistoryItem> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("query already in flight, dropping request");
            return None;
        }
        // Dropping the request future mid-await must release the flag,
        // otherwise every later query would be dropped as "in flight".
        let _running = RunningGuard(&self.running);

        let start = Instant::now();
        let sql = resolver::resolve(input);

        let (results, status) = if sql == resolver::SENTINEL_SQL {
            // The sentinel never touches the connection.
            (
                QueryResult::error("Could not execute query or invalid syntax."),
                "Error: Query failed.".to_string(),
            )
        } else {
            let pool = self.registry.current().await;
            match executor::execute(&pool, &sql).await {
                Ok(results) => {
                    let status = format!("Success: {} rows returned.", results.row_count());
                    (results, status)
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "query execution failed");
                    (QueryResult::error(message.clone()), format!("Error: {}", message))
                }
            }
        };

        let entry = QueryHistoryItem {
            id: IdGenerator::history_id(),
            natural_language: input.to_string(),
            generated_sql: sql,
            results,
            execution_time: round_seconds(start.elapsed().as_secs_f64()),
            timestamp: Utc::now().to_rfc3339(),
        };
        self.recorder.record(entry.clone()).await;
        self.set_status(status).await;
        Some(entry)
    }

    /// Re-introspects the current connection and publishes the catalog.
    ///
    /// All-or-nothing: on failure the previously published catalog and
    /// selection remain untouched. On success the first database and its
    /// first table become the active selection.
    pub async fn load_schema(&self) -> AppResult<Vec<Database>> {
        let pool = self.registry.current().await;
        let catalog = schema::load(&pool).await?;

        let mut selection = Selection::default();
        if let Some(db) = catalog.first() {
            selection.active_db = Some(db.name.clone());
            selection.active_table = db.tables.first().map(|t| t.name.clone());
        }
        *self.catalog.write().await = catalog.clone();
        *self.selection.write().await = selection;
        Ok(catalog)
    }

    /// Returns the published catalog.
    pub async fn catalog(&self) -> Vec<Database> {
        self.catalog.read().await.clone()
    }

    /// Connects according to the form data; non-embedded types are
    /// simulated. Failure leaves the prior connection untouched and
    /// surfaces through the status text as well as the returned error.
    pub async fn connect(&self, config: ConnectionConfig) -> AppResult<String> {
        self.set_status(format!("Connecting to {}...", config.db_type))
            .await;

        let outcome = match self.registry.connect(&config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.set_status(format!("Connection failed: {}", e)).await;
                return Err(e);
            }
        };

        *self.connection.write().await = config;
        let status = match outcome {
            ConnectOutcome::Connected { status } => {
                if let Err(e) = self.load_schema().await {
                    self.set_status(format!("Connection failed: {}", e)).await;
                    return Err(e);
                }
                status
            }
            ConnectOutcome::Simulated { status } => status,
        };
        self.set_status(status.clone()).await;
        Ok(status)
    }

    /// Renders the ER diagram source for the active database.
    pub async fn er_diagram(&self) -> String {
        let selection = self.selection.read().await;
        let Some(active_db) = selection.active_db.as_deref() else {
            return diagram::placeholder_no_selection();
        };
        let catalog = self.catalog.read().await;
        match catalog.iter().find(|db| db.name == active_db) {
            Some(db) => diagram::render_er_diagram(db),
            None => diagram::placeholder_not_found(),
        }
    }

    /// Returns a copy of the query history, oldest first.
    pub async fn history(&self) -> Vec<QueryHistoryItem> {
        self.recorder.snapshot().await
    }

    /// Builds the serialized session bundle.
    pub async fn export_session(&self) -> SessionBundle {
        SessionBundle {
            manifest: SessionManifest {
                version: BUNDLE_VERSION.to_string(),
                created: Utc::now().to_rfc3339(),
                title: SESSION_TITLE.to_string(),
            },
            connection: Some(self.connection.read().await.clone()),
            schema_snapshot: Some(self.catalog.read().await.clone()),
            query_history: self.recorder.snapshot().await,
        }
    }

    /// Download filename for an export, UTC-timestamped.
    pub fn export_filename() -> String {
        format!("orbit-session-{}.orb", Utc::now().format("%Y%m%d%H%M%S"))
    }

    /// Imports a session bundle, replacing history and, where present,
    /// connection config and schema snapshot.
    ///
    /// # Errors
    /// Returns `AppError::SessionImport` for a malformed payload; in that
    /// case no in-memory state changes (replace-or-reject).
    pub async fn import_session(&self, payload: &[u8]) -> AppResult<String> {
        let bundle = SessionBundle::from_json(payload)?;

        self.recorder.replace(bundle.query_history).await;
        if let Some(connection) = bundle.connection {
            *self.connection.write().await = connection;
        }
        if let Some(snapshot) = bundle.schema_snapshot {
            *self.catalog.write().await = snapshot;
        }

        let status = "Successfully imported session".to_string();
        self.set_status(status.clone()).await;
        Ok(status)
    }

    /// Clears the history and resets the status (File → New Session).
    pub async fn new_session(&self) {
        self.recorder.clear().await;
        self.set_status("New session started.").await;
    }

    /// Current status bar data.
    pub async fn status_info(&self) -> StatusInfo {
        StatusInfo {
            status_text: self.status.read().await.clone(),
            last_query_time: self
                .recorder
                .last()
                .await
                .map(|entry| entry.execution_time)
                .unwrap_or(0.0),
        }
    }

    async fn set_status(&self, text: impl Into<String>) {
        *self.status.write().await = text.into();
    }
}

/// Releases the mutual-exclusion flag when the execution future finishes,
/// including when it is dropped at a suspension point.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Rounds a duration in seconds to 2 decimal places.
fn round_seconds(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_initialize_publishes_demo_catalog() {
        let service = WorkbenchService::initialize().await.unwrap();
        let catalog = service.catalog().await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "main");
        assert_eq!(catalog[0].tables.len(), 3);

        let status = service.status_info().await;
        assert_eq!(status.status_text, "Connected to in-memory SQLite");
    }

    #[tokio::test]
    async fn test_natural_language_join_end_to_end() {
        let service = WorkbenchService::initialize().await.unwrap();
        let entry = service
            .run_query(r#"output("show me all users and their corresponding products")"#)
            .await
            .unwrap();

        assert_eq!(
            entry.results.columns,
            vec!["name", "email", "product_name", "price"]
        );
        assert_eq!(entry.results.rows.len(), 3);
        for row in &entry.results.rows {
            assert_eq!(row.len(), entry.results.columns.len());
        }
        assert_eq!(service.history().await.len(), 1);

        let status = service.status_info().await;
        assert_eq!(status.status_text, "Success: 3 rows returned.");
        assert!(status.last_query_time >= 0.0);
    }

    #[tokio::test]
    async fn test_sentinel_short_circuits_to_canned_result() {
        let service = WorkbenchService::initialize().await.unwrap();
        let entry = service
            .run_query(r#"output("tell me a joke")"#)
            .await
            .unwrap();

        assert_eq!(entry.generated_sql, resolver::SENTINEL_SQL);
        assert_eq!(entry.results.columns, vec!["Error"]);
        assert_eq!(
            entry.results.rows,
            vec![vec![Value::String(
                "Could not execute query or invalid syntax.".to_string()
            )]]
        );
        assert_eq!(
            service.status_info().await.status_text,
            "Error: Query failed."
        );
    }

    #[tokio::test]
    async fn test_execution_error_becomes_error_result() {
        let service = WorkbenchService::initialize().await.unwrap();
        let entry = service.run_query("SELECT * FROM missing_table").await.unwrap();

        assert_eq!(entry.results.columns, vec!["Error"]);
        assert_eq!(entry.results.rows.len(), 1);
        // The attempt is still recorded.
        assert_eq!(service.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_second_query_while_running_is_dropped() {
        let service = WorkbenchService::initialize().await.unwrap();
        service.run_query("SELECT 1 AS one;").await.unwrap();
        let before = service.history().await.len();

        service.running.store(true, Ordering::SeqCst);
        assert!(service.run_query("SELECT 2 AS two;").await.is_none());
        assert_eq!(service.history().await.len(), before);
        service.running.store(false, Ordering::SeqCst);
    }

    #[tokio::test]
    async fn test_cancelled_query_releases_the_flag() {
        let service = WorkbenchService::initialize().await.unwrap();
        // Zero timeout drops the execution future at its first suspension
        // point, after the mutual-exclusion flag has been taken.
        let _ = tokio::time::timeout(
            std::time::Duration::ZERO,
            service.run_query("SELECT * FROM users"),
        )
        .await;

        let before = service.history().await.len();
        let entry = service.run_query("SELECT 1 AS one;").await;
        assert!(entry.is_some());
        assert_eq!(service.history().await.len(), before + 1);
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let service = WorkbenchService::initialize().await.unwrap();
        service
            .run_query(r#"output("show first 2 rows from users")"#)
            .await
            .unwrap();
        service.run_query("SELECT * FROM products;").await.unwrap();

        let bundle = service.export_session().await;
        let payload = serde_json::to_vec(&bundle).unwrap();

        let fresh = WorkbenchService::initialize().await.unwrap();
        fresh.import_session(&payload).await.unwrap();

        let original = service.history().await;
        let imported = fresh.history().await;
        assert_eq!(imported.len(), 2);
        assert_eq!(original, imported);
        assert_eq!(fresh.catalog().await, service.catalog().await);
    }

    #[tokio::test]
    async fn test_malformed_import_leaves_state_untouched() {
        let service = WorkbenchService::initialize().await.unwrap();
        service.run_query("SELECT 1 AS one;").await.unwrap();

        let before_history = service.history().await;
        let before_catalog = service.catalog().await;
        assert!(service.import_session(b"{not json").await.is_err());
        assert!(service
            .import_session(br#"{"query_history": []}"#)
            .await
            .is_err());
        assert_eq!(service.history().await, before_history);
        assert_eq!(service.catalog().await, before_catalog);
    }

    #[tokio::test]
    async fn test_failed_connect_surfaces_failure_status() {
        let service = WorkbenchService::initialize().await.unwrap();
        let config = ConnectionConfig {
            database: "/nonexistent-dir/orbit.db".to_string(),
            ..Default::default()
        };

        assert!(service.connect(config).await.is_err());
        let status = service.status_info().await.status_text;
        assert!(
            status.starts_with("Connection failed:"),
            "unexpected status: {status}"
        );
        // The prior in-memory handle still serves queries.
        let entry = service.run_query("SELECT * FROM users;").await.unwrap();
        assert_eq!(entry.results.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_new_session_clears_history() {
        let service = WorkbenchService::initialize().await.unwrap();
        service.run_query("SELECT 1 AS one;").await.unwrap();
        service.new_session().await;

        assert!(service.history().await.is_empty());
        assert_eq!(
            service.status_info().await.status_text,
            "New session started."
        );
    }

    #[tokio::test]
    async fn test_er_diagram_for_active_database() {
        let service = WorkbenchService::initialize().await.unwrap();
        let text = service.er_diagram().await;
        assert!(text.starts_with("erDiagram\n"));
        assert!(text.contains("\"sales\" ||--o{ \"products\" : \"has\""));
        assert!(text.contains("\"sales\" ||--o{ \"users\" : \"has\""));
    }

    #[tokio::test]
    async fn test_limit_pattern_end_to_end() {
        let service = WorkbenchService::initialize().await.unwrap();
        let entry = service
            .run_query(r#"output("show first 2 rows from sales")"#)
            .await
            .unwrap();
        assert_eq!(entry.generated_sql, "SELECT * FROM sales LIMIT 2;");
        assert_eq!(entry.results.rows.len(), 2);
    }
}
