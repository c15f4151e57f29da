//! Cron scheduler (C8)
//!
//! Polls the `crons` table for rows whose `next_run_date` has passed,
//! fires a run for each through the [`RunScheduler`], and advances
//! `next_run_date` to the next occurrence. Runs as a single background
//! tokio task so `max_instances=1` falls out of the poll loop itself —
//! there is never more than one sweep in flight.

use crate::db::connection::DatabasePool;
use crate::db::models::{Cron, MultitaskStrategy, OnRunCompleted};
use crate::db::repositories::{CronRepository, ThreadRepository};
use crate::scheduler::RunScheduler;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum CronError {
    #[error("invalid cron schedule '{0}': {1}")]
    InvalidSchedule(String, String),

    #[error("schedule '{0}' has no upcoming occurrence")]
    NoUpcomingRun(String),
}

/// How often the background sweep checks for due crons. 60s matches the
/// misfire grace window the original scheduler granted late-firing jobs.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Accepts the same 5- or 6-field expressions as the original scheduler
/// (`minute hour day month dow`, or `second minute hour day month dow`)
/// and normalizes to the 6-field form the `cron` crate expects.
fn normalize_expression(schedule: &str) -> Result<String, CronError> {
    let fields: Vec<&str> = schedule.split_whitespace().collect();
    match fields.len() {
        5 => Ok(format!("0 {}", fields.join(" "))),
        6 => Ok(fields.join(" ")),
        n => Err(CronError::InvalidSchedule(
            schedule.to_string(),
            format!("expected 5 or 6 fields, got {n}"),
        )),
    }
}

pub fn parse_schedule(schedule: &str) -> Result<Schedule, CronError> {
    let normalized = normalize_expression(schedule)?;
    Schedule::from_str(&normalized).map_err(|e| CronError::InvalidSchedule(schedule.to_string(), e.to_string()))
}

/// Compute the next fire time strictly after `after`.
pub fn next_occurrence(schedule: &str, after: DateTime<Utc>) -> Result<DateTime<Utc>, CronError> {
    let parsed = parse_schedule(schedule)?;
    parsed
        .after(&after)
        .next()
        .ok_or_else(|| CronError::NoUpcomingRun(schedule.to_string()))
}

pub struct CronEngine {
    pool: Arc<DatabasePool>,
    scheduler: Arc<RunScheduler>,
}

impl CronEngine {
    pub fn new(pool: Arc<DatabasePool>, scheduler: Arc<RunScheduler>) -> Self {
        Self { pool, scheduler }
    }

    /// Spawn the background polling loop. Returns the task handle so the
    /// caller can abort it on shutdown.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep().await {
                    tracing::error!(error = %e, "cron sweep failed");
                }
            }
        })
    }

    /// One polling pass: fire every due cron, then advance its
    /// `next_run_date`. Coalesces misfires by only ever scheduling the
    /// single next occurrence after "now", same as the original's
    /// `coalesce=True` job default.
    pub async fn sweep(&self) -> Result<usize, CronError> {
        let now = Utc::now();
        let due = CronRepository::list_due(&self.pool, now)
            .await
            .map_err(|e| CronError::InvalidSchedule("<query>".into(), e.to_string()))?;

        let mut fired = 0;
        for cron in due {
            if let Err(e) = self.fire(&cron, now).await {
                tracing::error!(cron_id = %cron.cron_id, error = %e, "failed to fire cron");
                continue;
            }
            fired += 1;
        }
        Ok(fired)
    }

    /// Determine the thread a fire should run against: `keep` always gets a
    /// fresh thread (the prior run's history is left alone); `delete` reuses
    /// the cron's designated thread, creating and persisting it on first
    /// fire if one doesn't exist yet.
    async fn fire(&self, cron: &Cron, now: DateTime<Utc>) -> Result<(), CronError> {
        let owner = cron.metadata.0.get("owner").and_then(|v| v.as_str()).unwrap_or("system");

        let thread_id = match cron.on_run_completed_enum() {
            Some(OnRunCompleted::Delete) => match &cron.thread_id {
                Some(id) => id.clone(),
                None => {
                    let id = uuid::Uuid::new_v4().to_string();
                    ThreadRepository::create(&self.pool, &id, owner)
                        .await
                        .map_err(|e| CronError::InvalidSchedule(cron.cron_id.clone(), e.to_string()))?;
                    CronRepository::set_thread_id(&self.pool, &cron.cron_id, &id)
                        .await
                        .map_err(|e| CronError::InvalidSchedule(cron.cron_id.clone(), e.to_string()))?;
                    id
                }
            },
            Some(OnRunCompleted::Keep) | None => {
                let id = uuid::Uuid::new_v4().to_string();
                ThreadRepository::create(&self.pool, &id, owner)
                    .await
                    .map_err(|e| CronError::InvalidSchedule(cron.cron_id.clone(), e.to_string()))?;
                id
            }
        };

        let start = self
            .scheduler
            .start_run(
                Some(&thread_id),
                &cron.assistant_id,
                cron.payload.0.clone(),
                Some(MultitaskStrategy::Enqueue),
                owner,
            )
            .await;

        if let Err(e) = start {
            tracing::warn!(cron_id = %cron.cron_id, error = %e, "cron-triggered run was rejected");
        }

        let next = next_occurrence(&cron.schedule, now)?;
        CronRepository::set_next_run_date(&self.pool, &cron.cron_id, next)
            .await
            .map_err(|e| CronError::InvalidSchedule(cron.cron_id.clone(), e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalizes_five_field_expression_by_prepending_seconds() {
        assert_eq!(normalize_expression("*/5 * * * *").unwrap(), "0 */5 * * * *");
    }

    #[test]
    fn six_field_expression_passes_through_unchanged() {
        assert_eq!(normalize_expression("0 */5 * * * *").unwrap(), "0 */5 * * * *");
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(normalize_expression("* * *").is_err());
    }

    #[test]
    fn next_occurrence_after_now_is_strictly_later() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let next = next_occurrence("0 0 * * *", now).unwrap();
        assert!(next > now);
    }
}
