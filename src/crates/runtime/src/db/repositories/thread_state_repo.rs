//! Thread state snapshot repository (append-only history)

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::ThreadState;
use serde_json::Value;

pub struct ThreadStateRepository;

impl ThreadStateRepository {
    pub async fn append(pool: &DatabasePool, thread_id: &str, values: Value) -> DbResult<ThreadState> {
        let snapshot = ThreadState::new(thread_id.to_string(), values);

        sqlx::query_as::<_, ThreadState>(
            "INSERT INTO thread_states
                (checkpoint_id, thread_id, values, next, tasks, interrupts, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(&snapshot.checkpoint_id)
        .bind(&snapshot.thread_id)
        .bind(&snapshot.values)
        .bind(&snapshot.next)
        .bind(&snapshot.tasks)
        .bind(&snapshot.interrupts)
        .bind(snapshot.created_at)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn latest(pool: &DatabasePool, thread_id: &str) -> DbResult<Option<ThreadState>> {
        sqlx::query_as::<_, ThreadState>(
            "SELECT * FROM thread_states WHERE thread_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(thread_id)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Newest-first history, optionally excluding snapshots at or after
    /// `before`.
    pub async fn history(
        pool: &DatabasePool,
        thread_id: &str,
        limit: i64,
        before: Option<&str>,
    ) -> DbResult<Vec<ThreadState>> {
        match before {
            Some(before_id) => {
                sqlx::query_as::<_, ThreadState>(
                    "SELECT * FROM thread_states
                     WHERE thread_id = $1
                       AND created_at < (SELECT created_at FROM thread_states WHERE checkpoint_id = $2)
                     ORDER BY created_at DESC
                     LIMIT $3",
                )
                .bind(thread_id)
                .bind(before_id)
                .bind(limit.clamp(1, 1000))
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ThreadState>(
                    "SELECT * FROM thread_states
                     WHERE thread_id = $1
                     ORDER BY created_at DESC
                     LIMIT $2",
                )
                .bind(thread_id)
                .bind(limit.clamp(1, 1000))
                .fetch_all(pool)
                .await
            }
        }
        .map_err(DatabaseError::from)
    }
}
