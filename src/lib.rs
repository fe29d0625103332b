pub mod achievements; // Points, streaks, levels, badges
pub mod analytics; // Vitals averages over recent rows
pub mod api; // HTTP API (axum)
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod storage; // Object store for uploaded originals

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `config::default_log_filter()`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
