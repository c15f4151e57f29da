//! Assistant repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::Assistant;
use serde_json::Value;
use sqlx::types::Json;

pub struct AssistantRepository;

impl AssistantRepository {
    /// Create an assistant. The caller-provided `assistant_id` is honoured
    /// verbatim — never regenerated.
    pub async fn create(
        pool: &DatabasePool,
        assistant_id: &str,
        graph_id: &str,
        config: Value,
        context: Value,
        owner: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> DbResult<Assistant> {
        let metadata = serde_json::json!({ "owner": owner });
        sqlx::query_as::<_, Assistant>(
            "INSERT INTO assistants
                (assistant_id, graph_id, config, context, metadata, name, description, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 1, now(), now())
             RETURNING *",
        )
        .bind(assistant_id)
        .bind(graph_id)
        .bind(Json(config))
        .bind(Json(context))
        .bind(Json(metadata))
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Fetch an assistant by id or by graph_id fallback, scoped to callers
    /// who own it or `"system"`-owned assistants.
    pub async fn get(pool: &DatabasePool, assistant_id_or_graph_id: &str, owner: &str) -> DbResult<Option<Assistant>> {
        let found = sqlx::query_as::<_, Assistant>(
            "SELECT * FROM assistants
             WHERE assistant_id = $1
               AND (metadata->>'owner' = $2 OR metadata->>'owner' = 'system')",
        )
        .bind(assistant_id_or_graph_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)?;

        if found.is_some() {
            return Ok(found);
        }

        sqlx::query_as::<_, Assistant>(
            "SELECT * FROM assistants
             WHERE graph_id = $1
               AND (metadata->>'owner' = $2 OR metadata->>'owner' = 'system')
             ORDER BY created_at ASC
             LIMIT 1",
        )
        .bind(assistant_id_or_graph_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn search(
        pool: &DatabasePool,
        owner: &str,
        graph_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Assistant>> {
        sqlx::query_as::<_, Assistant>(
            "SELECT * FROM assistants
             WHERE (metadata->>'owner' = $1 OR metadata->>'owner' = 'system')
               AND ($2::text IS NULL OR graph_id = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(owner)
        .bind(graph_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn update(
        pool: &DatabasePool,
        assistant_id: &str,
        owner: &str,
        config: Option<Value>,
        name: Option<&str>,
        description: Option<&str>,
    ) -> DbResult<Assistant> {
        let existing = Self::get(pool, assistant_id, owner)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("assistant {assistant_id}")))?;

        if !existing.is_mutable_by(owner) {
            return Err(DatabaseError::constraint("assistant is not owned by caller"));
        }

        let next_config = config.unwrap_or(existing.config.0);
        let next_name = name.map(|s| s.to_string()).or(existing.name);
        let next_description = description.map(|s| s.to_string()).or(existing.description);

        sqlx::query_as::<_, Assistant>(
            "UPDATE assistants
             SET config = $2, name = $3, description = $4, updated_at = now()
             WHERE assistant_id = $1
             RETURNING *",
        )
        .bind(assistant_id)
        .bind(Json(next_config))
        .bind(next_name)
        .bind(next_description)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn delete(pool: &DatabasePool, assistant_id: &str, owner: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM assistants WHERE assistant_id = $1 AND metadata->>'owner' = $2",
        )
        .bind(assistant_id)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
