//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack on protected routes (outermost → innermost):
//! 1. Body limit → 2. Caller identity → 3. Access log

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the API router.
///
/// `/api/health` is public; every other route requires `X-User-Id`.
pub fn api_router(ctx: ApiContext) -> Router {
    let body_limit = ctx
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    // Layers are applied from bottom (innermost) to top (outermost).
    let protected = Router::new()
        .route("/records", get(endpoints::records::list))
        .route("/records/upload", post(endpoints::records::upload))
        .route("/records/:id", get(endpoints::records::detail))
        .route("/patient/analytics", get(endpoints::analytics::patient))
        .route("/achievements", get(endpoints::achievements::get))
        .route("/achievements/update", post(endpoints::achievements::update))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_caller))
        .layer(DefaultBodyLimit::max(body_limit));

    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new().nest("/api", protected.merge(public))
}
