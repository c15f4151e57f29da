//! Cross-thread memory store endpoints (C1/C2, §6 ambient surface)

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    DeleteStoreItemQuery, GetStoreItemQuery, PutStoreItemRequest, SearchStoreItemsRequest, StoreItemResponse,
};
use crate::api::response;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::StoreRepository;
use crate::namespace;

fn resolve_namespace(value: &serde_json::Value) -> ApiResult<Vec<String>> {
    namespace::normalise_store_namespace(value)
        .ok_or_else(|| ApiError::ValidationError("namespace must not be empty".to_string()))
}

pub async fn put_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PutStoreItemRequest>,
) -> ApiResult<Json<StoreItemResponse>> {
    let ns = resolve_namespace(&req.namespace)?;
    let item = StoreRepository::put(state.db.pool(), &ns, &req.key, req.value, user.owner()).await?;
    Ok(Json(StoreItemResponse::from(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<GetStoreItemQuery>,
) -> ApiResult<Json<StoreItemResponse>> {
    let ns = namespace::normalise_store_namespace_str(&query.namespace)
        .ok_or_else(|| ApiError::ValidationError("namespace must not be empty".to_string()))?;
    let item = StoreRepository::get(state.db.pool(), &ns, &query.key, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("store item {}/{}", query.namespace, query.key)))?;
    Ok(Json(StoreItemResponse::from(item)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DeleteStoreItemQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let ns = namespace::normalise_store_namespace_str(&query.namespace)
        .ok_or_else(|| ApiError::ValidationError("namespace must not be empty".to_string()))?;
    let deleted = StoreRepository::delete(state.db.pool(), &ns, &query.key, user.owner()).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("store item {}/{}", query.namespace, query.key)));
    }
    Ok(response::no_content())
}

pub async fn search_items(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SearchStoreItemsRequest>,
) -> ApiResult<Json<Vec<StoreItemResponse>>> {
    let prefix = resolve_namespace(&req.namespace_prefix)?;
    let items = StoreRepository::search(
        state.db.pool(),
        &prefix,
        user.owner(),
        req.limit.unwrap_or(100),
        req.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(items.into_iter().map(StoreItemResponse::from).collect()))
}

pub async fn list_namespaces(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Vec<String>>>> {
    let namespaces = StoreRepository::list_namespaces(state.db.pool(), user.owner()).await?;
    Ok(Json(namespaces))
}
