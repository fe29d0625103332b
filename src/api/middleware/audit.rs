//! Access logging middleware.
//!
//! Logs every protected request with caller, method, path, status and
//! latency. Runs innermost, after the caller middleware.

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::CallerContext;

pub async fn log_access(
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_id = req
        .extensions()
        .get::<CallerContext>()
        .map(|c| c.user_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        user_id = %user_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = %start.elapsed().as_millis(),
        "API access"
    );
    response
}
