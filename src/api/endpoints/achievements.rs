//! Achievement endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::achievements::{apply_action, get_or_create, parse_action};
use crate::api::error::ApiError;
use crate::api::types::{run_blocking, ApiContext, CallerContext};
use crate::models::AchievementState;

#[derive(Serialize)]
pub struct AchievementsResponse {
    pub achievements: AchievementState,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub action: Option<String>,
}

/// `GET /api/achievements`: caller's progress, created on first access.
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let achievements = run_blocking(move || {
        let conn = ctx.open_db()?;
        get_or_create(&conn, &caller.user_id).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(AchievementsResponse { achievements }))
}

/// `POST /api/achievements/update`: apply one named action.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let name = request
        .action
        .ok_or_else(|| ApiError::BadRequest("Missing action".into()))?;
    let action = parse_action(&name)?;
    let policy = ctx.config.daily_repeat_policy;
    let today = Utc::now().date_naive();

    let achievements = run_blocking(move || {
        let conn = ctx.open_db()?;
        apply_action(&conn, &caller.user_id, action, today, policy).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(AchievementsResponse { achievements }))
}
