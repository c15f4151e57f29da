//! Store item repository: tuple-keyed cross-thread memory (C1 namespaces)

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::StoreItem;
use serde_json::Value;
use sqlx::types::Json;

pub struct StoreRepository;

impl StoreRepository {
    pub async fn put(
        pool: &DatabasePool,
        namespace: &[String],
        key: &str,
        value: Value,
        owner: &str,
    ) -> DbResult<StoreItem> {
        sqlx::query_as::<_, StoreItem>(
            "INSERT INTO store_items (namespace, key, owner, value, metadata, created_at, updated_at)
             VALUES ($1, $2, $3, $4, '{}'::jsonb, now(), now())
             ON CONFLICT (namespace, key, owner)
             DO UPDATE SET value = EXCLUDED.value, updated_at = now()
             RETURNING *",
        )
        .bind(Json(namespace.to_vec()))
        .bind(key)
        .bind(owner)
        .bind(Json(value))
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn get(
        pool: &DatabasePool,
        namespace: &[String],
        key: &str,
        owner: &str,
    ) -> DbResult<Option<StoreItem>> {
        sqlx::query_as::<_, StoreItem>(
            "SELECT * FROM store_items WHERE namespace = $1 AND key = $2 AND owner = $3",
        )
        .bind(Json(namespace.to_vec()))
        .bind(key)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::from)
    }

    pub async fn delete(
        pool: &DatabasePool,
        namespace: &[String],
        key: &str,
        owner: &str,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM store_items WHERE namespace = $1 AND key = $2 AND owner = $3",
        )
        .bind(Json(namespace.to_vec()))
        .bind(key)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn search(
        pool: &DatabasePool,
        namespace_prefix: &[String],
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<StoreItem>> {
        sqlx::query_as::<_, StoreItem>(
            "SELECT * FROM store_items
             WHERE owner = $1 AND namespace @> $2
             ORDER BY updated_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(owner)
        .bind(Json(namespace_prefix.to_vec()))
        .bind(limit.clamp(1, 1000))
        .bind(offset.max(0))
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)
    }

    /// Distinct namespaces visible to `owner`, used by `GET /store/namespaces`.
    pub async fn list_namespaces(pool: &DatabasePool, owner: &str) -> DbResult<Vec<Vec<String>>> {
        let rows: Vec<(Json<Vec<String>>,)> = sqlx::query_as(
            "SELECT DISTINCT namespace FROM store_items WHERE owner = $1",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(|(ns,)| ns.0).collect())
    }
}
