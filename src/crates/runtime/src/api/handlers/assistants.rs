//! Assistant CRUD endpoints (§6 ambient surface)

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    AssistantResponse, CreateAssistantRequest, SearchAssistantsRequest, UpdateAssistantRequest,
};
use crate::api::response;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::AssistantRepository;
use serde_json::Value;

pub async fn create_assistant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateAssistantRequest>,
) -> ApiResult<Response> {
    let assistant_id = req.assistant_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if let Some(existing) = AssistantRepository::get(state.db.pool(), &assistant_id, user.owner()).await? {
        return match req.if_exists.as_deref() {
            Some("do_nothing") => Ok(response::ok(AssistantResponse::from(existing)).into_response()),
            _ => Err(ApiError::Conflict(format!("assistant {assistant_id} already exists"))),
        };
    }

    let assistant = AssistantRepository::create(
        state.db.pool(),
        &assistant_id,
        &req.graph_id,
        req.config.unwrap_or(Value::Object(Default::default())),
        req.context.unwrap_or(Value::Object(Default::default())),
        user.owner(),
        req.name.as_deref(),
        req.description.as_deref(),
    )
    .await?;

    Ok(response::created(AssistantResponse::from(assistant)).into_response())
}

pub async fn get_assistant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(assistant_id): Path<String>,
) -> ApiResult<Json<AssistantResponse>> {
    let assistant = AssistantRepository::get(state.db.pool(), &assistant_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assistant {assistant_id}")))?;
    Ok(Json(AssistantResponse::from(assistant)))
}

pub async fn update_assistant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(assistant_id): Path<String>,
    Json(req): Json<UpdateAssistantRequest>,
) -> ApiResult<Json<AssistantResponse>> {
    let assistant = AssistantRepository::update(
        state.db.pool(),
        &assistant_id,
        user.owner(),
        req.config,
        req.name.as_deref(),
        req.description.as_deref(),
    )
    .await?;
    Ok(Json(AssistantResponse::from(assistant)))
}

pub async fn delete_assistant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(assistant_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = AssistantRepository::delete(state.db.pool(), &assistant_id, user.owner()).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("assistant {assistant_id}")));
    }
    Ok(response::no_content())
}

pub async fn search_assistants(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SearchAssistantsRequest>,
) -> ApiResult<Json<Vec<AssistantResponse>>> {
    let assistants = AssistantRepository::search(
        state.db.pool(),
        user.owner(),
        req.graph_id.as_deref(),
        req.limit.unwrap_or(20),
        req.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(assistants.into_iter().map(AssistantResponse::from).collect()))
}
