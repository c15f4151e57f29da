//! Run model for database persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Error,
    Timeout,
    Interrupted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Error => "error",
            RunStatus::Timeout => "timeout",
            RunStatus::Interrupted => "interrupted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Error | RunStatus::Timeout | RunStatus::Interrupted
        )
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RunStatus::Pending),
            "running" => Ok(RunStatus::Running),
            "success" => Ok(RunStatus::Success),
            "error" => Ok(RunStatus::Error),
            "timeout" => Ok(RunStatus::Timeout),
            "interrupted" => Ok(RunStatus::Interrupted),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MultitaskStrategy {
    Reject,
    Enqueue,
    Interrupt,
    Rollback,
}

impl Default for MultitaskStrategy {
    fn default() -> Self {
        MultitaskStrategy::Reject
    }
}

impl std::str::FromStr for MultitaskStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(MultitaskStrategy::Reject),
            "enqueue" => Ok(MultitaskStrategy::Enqueue),
            "interrupt" => Ok(MultitaskStrategy::Interrupt),
            "rollback" => Ok(MultitaskStrategy::Rollback),
            other => Err(format!("unknown multitask strategy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Run {
    pub run_id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: String,
    pub metadata: Json<Value>,
    pub kwargs: Json<Value>,
    pub multitask_strategy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Run {
    pub fn new(
        thread_id: String,
        assistant_id: String,
        kwargs: Value,
        multitask_strategy: MultitaskStrategy,
        owner: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            thread_id,
            assistant_id,
            status: RunStatus::Pending.as_str().to_string(),
            metadata: Json(serde_json::json!({ "owner": owner })),
            kwargs: Json(kwargs),
            multitask_strategy: multitask_strategy.as_str_value().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> Option<RunStatus> {
        self.status.parse().ok()
    }

    pub fn is_terminal(&self) -> bool {
        self.status().map(|s| s.is_terminal()).unwrap_or(false)
    }
}

impl MultitaskStrategy {
    fn as_str_value(&self) -> &'static str {
        match self {
            MultitaskStrategy::Reject => "reject",
            MultitaskStrategy::Enqueue => "enqueue",
            MultitaskStrategy::Interrupt => "interrupt",
            MultitaskStrategy::Rollback => "rollback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_run_starts_pending_and_non_terminal() {
        let r = Run::new(
            "t1".into(),
            "a1".into(),
            json!({}),
            MultitaskStrategy::Reject,
            "user-1",
        );
        assert_eq!(r.status().unwrap(), RunStatus::Pending);
        assert!(!r.is_terminal());
    }

    #[test]
    fn terminal_statuses_are_recognised() {
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Error.is_terminal());
        assert!(RunStatus::Timeout.is_terminal());
        assert!(RunStatus::Interrupted.is_terminal());
        assert!(!RunStatus::Pending.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }
}
