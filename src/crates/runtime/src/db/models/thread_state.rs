//! Thread state snapshot model (append-only history of a thread's values)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThreadState {
    pub checkpoint_id: String,
    pub thread_id: String,
    pub values: Json<Value>,
    pub next: Json<Value>,
    pub tasks: Json<Value>,
    pub interrupts: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl ThreadState {
    pub fn new(thread_id: String, values: Value) -> Self {
        Self {
            checkpoint_id: uuid::Uuid::new_v4().to_string(),
            thread_id,
            values: Json(values),
            next: Json(Value::Array(Vec::new())),
            tasks: Json(Value::Array(Vec::new())),
            interrupts: Json(Value::Array(Vec::new())),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_state_gets_a_fresh_checkpoint_id() {
        let a = ThreadState::new("t1".into(), json!({"messages": []}));
        let b = ThreadState::new("t1".into(), json!({"messages": []}));
        assert_ne!(a.checkpoint_id, b.checkpoint_id);
    }
}
