//! Thread model for database persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    Idle,
    Busy,
    Interrupted,
    Error,
}

impl ThreadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadStatus::Idle => "idle",
            ThreadStatus::Busy => "busy",
            ThreadStatus::Interrupted => "interrupted",
            ThreadStatus::Error => "error",
        }
    }
}

impl std::str::FromStr for ThreadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(ThreadStatus::Idle),
            "busy" => Ok(ThreadStatus::Busy),
            "interrupted" => Ok(ThreadStatus::Interrupted),
            "error" => Ok(ThreadStatus::Error),
            other => Err(format!("unknown thread status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Thread {
    pub thread_id: String,
    pub status: String,
    pub values: Json<Value>,
    pub interrupts: Json<Value>,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(thread_id: String, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            thread_id,
            status: ThreadStatus::Idle.as_str().to_string(),
            values: Json(Value::Object(Default::default())),
            interrupts: Json(Value::Array(Vec::new())),
            metadata: Json(serde_json::json!({ "owner": owner })),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.metadata.0.get("owner").and_then(|v| v.as_str())
    }

    pub fn is_accessible_by(&self, caller_owner: &str) -> bool {
        matches!(self.owner(), Some(owner) if owner == caller_owner || owner == "system")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_thread_starts_idle() {
        let t = Thread::new("t1".into(), "user-1");
        assert_eq!(t.status, "idle");
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!("busy".parse::<ThreadStatus>().unwrap(), ThreadStatus::Busy);
        assert!("bogus".parse::<ThreadStatus>().is_err());
    }
}
