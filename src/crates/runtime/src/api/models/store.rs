//! Cross-thread memory store (C1/C2) request/response DTOs

use crate::db::models::StoreItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct PutStoreItemRequest {
    pub namespace: Value,
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetStoreItemQuery {
    pub namespace: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteStoreItemQuery {
    pub namespace: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchStoreItemsRequest {
    pub namespace_prefix: Value,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreItemResponse {
    pub namespace: Vec<String>,
    pub key: String,
    pub value: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StoreItem> for StoreItemResponse {
    fn from(item: StoreItem) -> Self {
        Self {
            namespace: item.namespace.0,
            key: item.key,
            value: item.value.0,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}
