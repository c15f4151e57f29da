//! Assistant model for database persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

/// A configured graph instance.
///
/// `metadata` always carries an `owner` key; assistants owned by the
/// sentinel `"system"` are readable by any authenticated caller but
/// mutable only by `"system"`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assistant {
    pub assistant_id: String,
    pub graph_id: String,
    pub config: Json<Value>,
    pub context: Json<Value>,
    pub metadata: Json<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assistant {
    pub fn new(assistant_id: String, graph_id: String, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            assistant_id,
            graph_id,
            config: Json(Value::Object(Default::default())),
            context: Json(Value::Object(Default::default())),
            metadata: Json(serde_json::json!({ "owner": owner })),
            name: None,
            description: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.metadata.0.get("owner").and_then(|v| v.as_str())
    }

    /// True if `caller_owner` may read this assistant: either it owns it, or
    /// the assistant belongs to the `"system"` sentinel.
    pub fn is_readable_by(&self, caller_owner: &str) -> bool {
        match self.owner() {
            Some(owner) => owner == caller_owner || owner == "system",
            None => false,
        }
    }

    /// True if `caller_owner` may mutate this assistant: it must own it
    /// directly. `"system"`-owned assistants are immutable to non-system
    /// callers even though they're widely readable.
    pub fn is_mutable_by(&self, caller_owner: &str) -> bool {
        self.owner() == Some(caller_owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assistant_carries_owner_in_metadata() {
        let a = Assistant::new("a1".into(), "agent".into(), "user-1");
        assert_eq!(a.owner(), Some("user-1"));
        assert_eq!(a.version, 1);
    }

    #[test]
    fn system_owned_is_readable_by_anyone_but_not_mutable() {
        let a = Assistant::new("a1".into(), "agent".into(), "system");
        assert!(a.is_readable_by("user-1"));
        assert!(!a.is_mutable_by("user-1"));
        assert!(a.is_mutable_by("system"));
    }

    #[test]
    fn non_system_owned_is_not_readable_by_other_users() {
        let a = Assistant::new("a1".into(), "agent".into(), "user-1");
        assert!(!a.is_readable_by("user-2"));
    }
}
