//! # Key-Value Repository
//!
//! Stores whole serialized collections in the `kv_store` table.
//!
//! ## Table Layout
//! ```text
//! ┌───────────┬──────────────────┬──────────────────────┬──────────────────┐
//! │ namespace │ key              │ value                │ updated_at       │
//! ├───────────┼──────────────────┼──────────────────────┼──────────────────┤
//! │ stall     │ saree_inventory  │ [{"id":"…",…}, …]    │ 2026-10-19T…     │
//! │ stall     │ saree_sales      │ [{"id":"…",…}, …]    │ 2026-10-19T…     │
//! └───────────┴──────────────────┴──────────────────────┴──────────────────┘
//!   PRIMARY KEY (namespace, key)
//! ```
//!
//! A `put` is a single upsert statement, so a reader sees either the old
//! value or the new one.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::DurableStore;

/// One namespace of the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
    namespace: String,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool, namespace: impl Into<String>) -> Self {
        KvRepository {
            pool,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Every key written in this namespace, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            "SELECT key FROM kv_store WHERE namespace = ?1 ORDER BY key",
        )
        .bind(&self.namespace)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }
}

#[async_trait]
impl DurableStore for KvRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM kv_store WHERE namespace = ?1 AND key = ?2",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        debug!(namespace = %self.namespace, key, found = value.is_some(), "kv get");
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(namespace = %self.namespace, key, bytes = value.len(), "kv put");
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE namespace = ?1 AND key = ?2")
            .bind(&self.namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(namespace = %self.namespace, key, "kv delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let db = database().await;
        let kv = db.kv("stall");

        assert_eq!(kv.get("saree_sales").await.unwrap(), None);

        kv.put("saree_sales", "[]").await.unwrap();
        kv.put("saree_sales", "[1]").await.unwrap();

        assert_eq!(kv.get("saree_sales").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(kv.keys().await.unwrap(), vec!["saree_sales".to_string()]);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let db = database().await;
        let live = db.kv("stall");
        let other = db.kv("training");

        live.put("saree_inventory", "[\"live\"]").await.unwrap();

        assert_eq!(other.get("saree_inventory").await.unwrap(), None);
        assert_eq!(other.namespace(), "training");
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let db = database().await;
        let kv = db.kv("stall");

        kv.delete("nothing").await.unwrap();
        kv.put("k", "v").await.unwrap();
        kv.delete("k").await.unwrap();

        assert_eq!(kv.get("k").await.unwrap(), None);
    }
}
