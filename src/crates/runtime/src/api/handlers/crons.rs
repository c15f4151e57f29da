//! Cron endpoints (C8, §6)

use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CreateCronRequest, CronResponse};
use crate::api::response;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::cron_scheduler::next_occurrence;
use crate::db::repositories::CronRepository;

pub async fn create_cron(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateCronRequest>,
) -> ApiResult<Json<CronResponse>> {
    req.on_run_completed_enum().map_err(ApiError::ValidationError)?;

    let next_run_date = next_occurrence(&req.schedule, chrono::Utc::now())
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let cron = CronRepository::create(
        state.db.pool(),
        &req.assistant_id,
        None,
        &req.schedule,
        req.end_time,
        req.payload.unwrap_or(Value::Object(Default::default())),
        next_run_date,
        &req.on_run_completed,
        user.owner(),
    )
    .await?;

    Ok(Json(CronResponse::from(cron)))
}

pub async fn delete_cron(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cron_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = CronRepository::delete(state.db.pool(), &cron_id, user.owner()).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("cron {cron_id}")));
    }
    Ok(response::no_content())
}
