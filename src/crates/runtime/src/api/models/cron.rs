//! Cron request/response DTOs

use crate::db::models::{Cron, OnRunCompleted};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_on_run_completed() -> String {
    "keep".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCronRequest {
    pub assistant_id: String,
    pub schedule: String,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default = "default_on_run_completed")]
    pub on_run_completed: String,
    #[serde(default)]
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl CreateCronRequest {
    pub fn on_run_completed_enum(&self) -> Result<OnRunCompleted, String> {
        self.on_run_completed.parse()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CronResponse {
    pub cron_id: String,
    pub assistant_id: String,
    pub thread_id: Option<String>,
    pub schedule: String,
    pub next_run_date: Option<String>,
    pub on_run_completed: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Cron> for CronResponse {
    fn from(cron: Cron) -> Self {
        Self {
            cron_id: cron.cron_id,
            assistant_id: cron.assistant_id,
            thread_id: cron.thread_id,
            schedule: cron.schedule,
            next_run_date: cron.next_run_date.map(|t| t.to_rfc3339()),
            on_run_completed: cron.on_run_completed,
            created_at: cron.created_at.to_rfc3339(),
            updated_at: cron.updated_at.to_rfc3339(),
        }
    }
}
