//! Cron repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Cron;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;

pub struct CronRepository;

impl CronRepository {
    pub async fn create(
        pool: &DatabasePool,
        assistant_id: &str,
        thread_id: Option<&str>,
        schedule: &str,
        end_time: Option<DateTime<Utc>>,
        payload: Value,
        next_run_date: DateTime<Utc>,
        on_run_completed: &str,
        owner: &str,
    ) -> DbResult<Cron> {
        let metadata = serde_json::json!({ "owner": owner });

        sqlx::query_as::<_, Cron>(
            "INSERT INTO crons
                (cron_id, assistant_id, thread_id, schedule, end_time, payload,
                 next_run_date, on_run_completed, metadata, created_at, updated_at)
             VALUES (gen_random_uuid()::text, $1, $2, $3, $4, $5, $6, $7, $8, now(), now())
             RETURNING *",
        )
        .bind(assistant_id)
        .bind(thread_id)
        .bind(schedule)
        .bind(end_time)
        .bind(Json(payload))
        .bind(next_run_date)
        .bind(on_run_completed)
        .bind(Json(metadata))
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn get(pool: &DatabasePool, cron_id: &str) -> DbResult<Option<Cron>> {
        sqlx::query_as::<_, Cron>("SELECT * FROM crons WHERE cron_id = $1")
            .bind(cron_id)
            .fetch_optional(pool)
            .await
            .map_err(DatabaseError::from)
    }

    pub async fn list_due(pool: &DatabasePool, as_of: DateTime<Utc>) -> DbResult<Vec<Cron>> {
        sqlx::query_as::<_, Cron>(
            "SELECT * FROM crons
             WHERE next_run_date <= $1 AND (end_time IS NULL OR end_time > $1)",
        )
        .bind(as_of)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn list_all(pool: &DatabasePool, owner: &str) -> DbResult<Vec<Cron>> {
        sqlx::query_as::<_, Cron>(
            "SELECT * FROM crons WHERE metadata->>'owner' = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn set_thread_id(pool: &DatabasePool, cron_id: &str, thread_id: &str) -> DbResult<()> {
        sqlx::query("UPDATE crons SET thread_id = $2, updated_at = now() WHERE cron_id = $1")
            .bind(cron_id)
            .bind(thread_id)
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    pub async fn set_next_run_date(
        pool: &DatabasePool,
        cron_id: &str,
        next_run_date: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query("UPDATE crons SET next_run_date = $2, updated_at = now() WHERE cron_id = $1")
            .bind(cron_id)
            .bind(next_run_date)
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    pub async fn delete(pool: &DatabasePool, cron_id: &str, owner: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM crons WHERE cron_id = $1 AND metadata->>'owner' = $2")
            .bind(cron_id)
            .bind(owner)
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
