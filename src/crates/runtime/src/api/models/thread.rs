//! Thread request/response DTOs

use crate::db::models::{Thread, ThreadState};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub if_exists: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchThreadRequest {
    pub metadata: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    pub thread_id: String,
    pub status: String,
    pub values: Value,
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        Self {
            thread_id: thread.thread_id,
            status: thread.status,
            values: thread.values.0,
            metadata: thread.metadata.0,
            created_at: thread.created_at.to_rfc3339(),
            updated_at: thread.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadStateResponse {
    pub checkpoint_id: String,
    pub values: Value,
    pub next: Value,
    pub tasks: Value,
    pub created_at: String,
}

impl From<ThreadState> for ThreadStateResponse {
    fn from(state: ThreadState) -> Self {
        Self {
            checkpoint_id: state.checkpoint_id,
            values: state.values.0,
            next: state.next.0,
            tasks: state.tasks.0,
            created_at: state.created_at.to_rfc3339(),
        }
    }
}
