//! Shared types for the API layer.

use std::sync::Arc;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::db::sqlite::open_database;
use crate::pipeline::extraction::FallbackOrchestrator;
use crate::pipeline::ingest::IngestionCoordinator;
use crate::storage::ObjectStore;

// ═══════════════════════════════════════════════════════════
// API context, shared by every route
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<FallbackOrchestrator>,
    pub coordinator: Arc<IngestionCoordinator>,
}

impl ApiContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ObjectStore>,
        orchestrator: Arc<FallbackOrchestrator>,
    ) -> Self {
        let coordinator = IngestionCoordinator::new(
            store,
            Arc::clone(&orchestrator),
            config.max_upload_bytes,
            config.daily_repeat_policy,
        );
        Self {
            config: Arc::new(config),
            orchestrator,
            coordinator: Arc::new(coordinator),
        }
    }

    /// Open a fresh connection for one request.
    ///
    /// Connections are never shared across requests; concurrent writers
    /// are serialized by SQLite under the configured busy timeout.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        open_database(&self.config.database_path(), self.config.db_busy_timeout)
            .map_err(ApiError::from)
    }
}

// ═══════════════════════════════════════════════════════════
// Caller context, injected by the caller middleware
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
}

/// Run blocking database or inference work off the async runtime.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}
