//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Configured inference backends in fallback order.
    pub inference_backends: Vec<String>,
}

/// `GET /api/health`: liveness plus the configured backend chain.
pub async fn check(
    State(ctx): State<ApiContext>,
) -> Result<Json<HealthResponse>, ApiError> {
    let inference_backends = ctx
        .orchestrator
        .backend_ids()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        inference_backends,
    }))
}
