//! Thread repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{Thread, ThreadStatus};
use serde_json::Value;
use sqlx::types::Json;

pub struct ThreadRepository;

impl ThreadRepository {
    pub async fn create(pool: &DatabasePool, thread_id: &str, owner: &str) -> DbResult<Thread> {
        let metadata = serde_json::json!({ "owner": owner });
        sqlx::query_as::<_, Thread>(
            "INSERT INTO threads (thread_id, status, values, interrupts, metadata, created_at, updated_at)
             VALUES ($1, 'idle', '{}'::jsonb, '[]'::jsonb, $2, now(), now())
             RETURNING *",
        )
        .bind(thread_id)
        .bind(Json(metadata))
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn get(pool: &DatabasePool, thread_id: &str, owner: &str) -> DbResult<Option<Thread>> {
        sqlx::query_as::<_, Thread>(
            "SELECT * FROM threads
             WHERE thread_id = $1 AND (metadata->>'owner' = $2 OR metadata->>'owner' = 'system')",
        )
        .bind(thread_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn set_status(
        pool: &DatabasePool,
        thread_id: &str,
        status: ThreadStatus,
    ) -> DbResult<()> {
        sqlx::query("UPDATE threads SET status = $2, updated_at = now() WHERE thread_id = $1")
            .bind(thread_id)
            .bind(status.as_str())
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    pub async fn set_values(pool: &DatabasePool, thread_id: &str, values: Value) -> DbResult<()> {
        sqlx::query("UPDATE threads SET values = $2, updated_at = now() WHERE thread_id = $1")
            .bind(thread_id)
            .bind(Json(values))
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    pub async fn patch_metadata(
        pool: &DatabasePool,
        thread_id: &str,
        metadata: Value,
    ) -> DbResult<Thread> {
        sqlx::query_as::<_, Thread>(
            "UPDATE threads
             SET metadata = metadata || $2, updated_at = now()
             WHERE thread_id = $1
             RETURNING *",
        )
        .bind(thread_id)
        .bind(Json(metadata))
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Deletes the thread. Its runs cascade-delete via the foreign key.
    pub async fn delete(pool: &DatabasePool, thread_id: &str, owner: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE thread_id = $1 AND metadata->>'owner' = $2")
            .bind(thread_id)
            .bind(owner)
            .execute(pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Exercised against a live Postgres instance in integration tests
    // (see tests/thread_repo.rs); pure-logic coverage lives in
    // db::models::thread.
}
