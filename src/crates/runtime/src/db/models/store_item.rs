//! Store item model: tuple-keyed cross-thread memory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoreItem {
    pub namespace: Json<Vec<String>>,
    pub key: String,
    pub owner: String,
    pub value: Json<Value>,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreItem {
    pub fn new(namespace: Vec<String>, key: String, value: Value, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            namespace: Json(namespace),
            key,
            owner: owner.to_string(),
            value: Json(value),
            metadata: Json(Value::Object(Default::default())),
            created_at: now,
            updated_at: now,
        }
    }
}
