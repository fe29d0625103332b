//! Patient analytics endpoint.

use axum::extract::{Query, State};
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::analytics::{patient_analytics, PatientAnalytics, DEFAULT_ANALYTICS_LIMIT};
use crate::api::error::ApiError;
use crate::api::types::{run_blocking, ApiContext, CallerContext};

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub limit: Option<usize>,
}

/// `GET /api/patient/analytics?limit=N`: recent vitals and their averages.
pub async fn patient(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<PatientAnalytics>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_ANALYTICS_LIMIT);
    let policy = ctx.config.averaging_policy;

    let analytics = run_blocking(move || {
        let conn = ctx.open_db()?;
        patient_analytics(&conn, &caller.user_id, limit, policy).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(analytics))
}
