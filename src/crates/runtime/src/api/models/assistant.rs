//! Assistant request/response DTOs

use crate::db::models::Assistant;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssistantRequest {
    #[serde(default)]
    pub assistant_id: Option<String>,
    pub graph_id: String,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub context: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub if_exists: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssistantRequest {
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchAssistantsRequest {
    #[serde(default)]
    pub graph_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantResponse {
    pub assistant_id: String,
    pub graph_id: String,
    pub config: Value,
    pub context: Value,
    pub metadata: Value,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Assistant> for AssistantResponse {
    fn from(a: Assistant) -> Self {
        Self {
            assistant_id: a.assistant_id,
            graph_id: a.graph_id,
            config: a.config.0,
            context: a.context.0,
            metadata: a.metadata.0,
            name: a.name,
            description: a.description,
            version: a.version,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}
