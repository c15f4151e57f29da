//! Run repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{MultitaskStrategy, Run, RunStatus};
use serde_json::Value;

pub struct RunRepository;

impl RunRepository {
    pub async fn create(
        pool: &DatabasePool,
        thread_id: &str,
        assistant_id: &str,
        kwargs: Value,
        multitask_strategy: MultitaskStrategy,
        owner: &str,
    ) -> DbResult<Run> {
        let run = Run::new(
            thread_id.to_string(),
            assistant_id.to_string(),
            kwargs,
            multitask_strategy,
            owner,
        );

        sqlx::query_as::<_, Run>(
            "INSERT INTO runs
                (run_id, thread_id, assistant_id, status, metadata, kwargs, multitask_strategy, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&run.run_id)
        .bind(&run.thread_id)
        .bind(&run.assistant_id)
        .bind(&run.status)
        .bind(&run.metadata)
        .bind(&run.kwargs)
        .bind(&run.multitask_strategy)
        .bind(run.created_at)
        .bind(run.updated_at)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn get(pool: &DatabasePool, run_id: &str, owner: &str) -> DbResult<Option<Run>> {
        sqlx::query_as::<_, Run>(
            "SELECT * FROM runs
             WHERE run_id = $1 AND (metadata->>'owner' = $2 OR metadata->>'owner' = 'system')",
        )
        .bind(run_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Any run on this thread still in `{pending, running}`. Used by the run
    /// scheduler (C6) to enforce multitask policy.
    pub async fn get_active_run(pool: &DatabasePool, thread_id: &str) -> DbResult<Option<Run>> {
        sqlx::query_as::<_, Run>(
            "SELECT * FROM runs
             WHERE thread_id = $1 AND status IN ('pending', 'running')
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(thread_id)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn list_by_thread(
        pool: &DatabasePool,
        thread_id: &str,
        status: Option<RunStatus>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Run>> {
        sqlx::query_as::<_, Run>(
            "SELECT * FROM runs
             WHERE thread_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(thread_id)
        .bind(status.map(|s| s.as_str()))
        .bind(limit.clamp(1, 100))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Transitions are one-way: non-terminal -> terminal (or pending ->
    /// running). Callers are responsible for only requesting legal moves.
    pub async fn set_status(pool: &DatabasePool, run_id: &str, status: RunStatus) -> DbResult<Run> {
        sqlx::query_as::<_, Run>(
            "UPDATE runs SET status = $2, updated_at = now() WHERE run_id = $1 RETURNING *",
        )
        .bind(run_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn delete(pool: &DatabasePool, thread_id: &str, run_id: &str, owner: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM runs
             WHERE run_id = $1 AND thread_id = $2 AND metadata->>'owner' = $3",
        )
        .bind(run_id)
        .bind(thread_id)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
