//! # SQLite Storage
//!
//! Persists cart snapshots in the `kv_store` table through
//! [`cart_db::KeyValueRepository`].
//!
//! ```text
//! SqliteStorage
//!      │
//!      ▼
//! Database::key_values()
//!      │
//!      ▼
//! kv_store (key = "@RocketShoes:cart", value = JSON line items)
//! ```

use async_trait::async_trait;
use cart_db::Database;

use super::CartStorage;
use crate::error::StorageResult;

/// Cart storage on a local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        SqliteStorage { db }
    }
}

#[async_trait]
impl CartStorage for SqliteStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.db.key_values().get(key).await?)
    }

    async fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        Ok(self.db.key_values().put(key, value).await?)
    }
}
