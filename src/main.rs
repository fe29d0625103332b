use std::process::ExitCode;
use std::sync::Arc;

use healthvault::api::{self, ApiContext};
use healthvault::config::{self, AppConfig};
use healthvault::db::sqlite::open_database;
use healthvault::pipeline::extraction::FallbackOrchestrator;
use healthvault::storage::LocalObjectStore;

fn main() -> ExitCode {
    healthvault::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server exited with error");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Creates the data directory and applies migrations before serving.
    drop(open_database(&config.database_path(), config.db_busy_timeout)?);
    tracing::info!(path = %config.database_path().display(), "Database ready");

    let store = Arc::new(LocalObjectStore::new(
        config.objects_dir(),
        &config.public_base_url,
    ));
    let orchestrator = Arc::new(FallbackOrchestrator::from_config(&config));
    if orchestrator.is_empty() {
        tracing::warn!("No inference backend configured, uploads use the local heuristic only");
    } else {
        tracing::info!(backends = ?orchestrator.backend_ids(), "Inference chain configured");
    }

    let addr = config.bind_addr;
    let ctx = ApiContext::new(config, store, orchestrator);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(api::serve(ctx, addr, shutdown_signal()))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
