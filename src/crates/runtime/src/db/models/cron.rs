//! Cron model: a template that fires runs on a schedule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnRunCompleted {
    Delete,
    Keep,
}

impl std::str::FromStr for OnRunCompleted {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(OnRunCompleted::Delete),
            "keep" => Ok(OnRunCompleted::Keep),
            other => Err(format!("unknown on_run_completed: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cron {
    pub cron_id: String,
    pub assistant_id: String,
    pub thread_id: Option<String>,
    pub schedule: String,
    pub end_time: Option<DateTime<Utc>>,
    pub payload: Json<Value>,
    pub next_run_date: Option<DateTime<Utc>>,
    pub on_run_completed: String,
    pub metadata: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cron {
    pub fn new(
        assistant_id: String,
        schedule: String,
        payload: Value,
        on_run_completed: OnRunCompleted,
        owner: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            cron_id: uuid::Uuid::new_v4().to_string(),
            assistant_id,
            thread_id: None,
            schedule,
            end_time: None,
            payload: Json(payload),
            next_run_date: None,
            on_run_completed: match on_run_completed {
                OnRunCompleted::Delete => "delete".to_string(),
                OnRunCompleted::Keep => "keep".to_string(),
            },
            metadata: Json(serde_json::json!({ "owner": owner })),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn on_run_completed_enum(&self) -> Option<OnRunCompleted> {
        self.on_run_completed.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_run_completed_enum_parses_stored_string() {
        let cron = Cron::new("a1".into(), "* * * * *".into(), serde_json::json!({}), OnRunCompleted::Delete, "user-1");
        assert_eq!(cron.on_run_completed_enum(), Some(OnRunCompleted::Delete));
    }
}
