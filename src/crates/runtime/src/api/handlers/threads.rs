//! Thread CRUD endpoints (§6 ambient surface)

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    CreateThreadRequest, PatchThreadRequest, ThreadResponse, ThreadStateResponse,
};
use crate::api::response;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::{ThreadRepository, ThreadStateRepository};

pub async fn create_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<Response> {
    let thread_id = req.thread_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if let Some(existing) = ThreadRepository::get(state.db.pool(), &thread_id, user.owner()).await? {
        return match req.if_exists.as_deref() {
            Some("do_nothing") | None => Ok(response::ok(ThreadResponse::from(existing)).into_response()),
            _ => Err(ApiError::Conflict(format!("thread {thread_id} already exists"))),
        };
    }

    let thread = ThreadRepository::create(state.db.pool(), &thread_id, user.owner()).await?;

    if let Some(metadata) = req.metadata {
        let thread = ThreadRepository::patch_metadata(state.db.pool(), &thread.thread_id, metadata).await?;
        return Ok(response::created(ThreadResponse::from(thread)).into_response());
    }

    Ok(response::created(ThreadResponse::from(thread)).into_response())
}

pub async fn get_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadResponse>> {
    let thread = ThreadRepository::get(state.db.pool(), &thread_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))?;
    Ok(Json(ThreadResponse::from(thread)))
}

pub async fn patch_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
    Json(req): Json<PatchThreadRequest>,
) -> ApiResult<Json<ThreadResponse>> {
    ThreadRepository::get(state.db.pool(), &thread_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))?;

    let thread = ThreadRepository::patch_metadata(state.db.pool(), &thread_id, req.metadata).await?;
    Ok(Json(ThreadResponse::from(thread)))
}

pub async fn delete_thread(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let deleted = ThreadRepository::delete(state.db.pool(), &thread_id, user.owner()).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("thread {thread_id}")));
    }
    Ok(response::no_content())
}

pub async fn get_state(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadStateResponse>> {
    ThreadRepository::get(state.db.pool(), &thread_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))?;

    let snapshot = ThreadStateRepository::latest(state.db.pool(), &thread_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no state recorded for thread {thread_id}")))?;
    Ok(Json(ThreadStateResponse::from(snapshot)))
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub before: Option<String>,
}

pub async fn get_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<ThreadStateResponse>>> {
    ThreadRepository::get(state.db.pool(), &thread_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))?;

    let history = ThreadStateRepository::history(
        state.db.pool(),
        &thread_id,
        query.limit.unwrap_or(10),
        query.before.as_deref(),
    )
    .await?;

    Ok(Json(history.into_iter().map(ThreadStateResponse::from).collect()))
}
