//! Database models
//!
//! Core data models persisted in the `langgraph_server` Postgres schema.
//! Timestamps are native `TIMESTAMPTZ` / `chrono::DateTime<Utc>`; structured
//! fields are native `JSONB` / `sqlx::types::Json<serde_json::Value>` —
//! never string-serialised JSON.

pub mod assistant;
pub mod cron;
pub mod run;
pub mod store_item;
pub mod thread;
pub mod thread_state;

pub use assistant::Assistant;
pub use cron::{Cron, OnRunCompleted};
pub use run::{MultitaskStrategy, Run, RunStatus};
pub use store_item::StoreItem;
pub use thread::{Thread, ThreadStatus};
pub use thread_state::ThreadState;
