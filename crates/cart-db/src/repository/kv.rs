//! # Key-Value Repository
//!
//! Whole-value storage keyed by a namespace string.
//!
//! Every `put` replaces the stored value in a single UPSERT statement, so a
//! reader sees either the previous value or the new one, never a mix.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(Some(value))` - Key present
    /// * `Ok(None)` - Key never written
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "Key-value read");
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Key-value written");
        Ok(())
    }
}
