//! # Cart Storage
//!
//! Durable home of the cart snapshot, addressed by a namespace key.
//!
//! ```text
//! restore:  storage.read(key)  ──► Some(json) ──► snapshot::decode
//! commit:   snapshot::encode   ──► storage.write(key, json)
//! ```
//!
//! Writes replace the whole value. There is no partial update.

use async_trait::async_trait;

use crate::error::StorageResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Key-value medium for cart snapshots.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Returns the value under `key`, or `None` if it was never written.
    async fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the value under `key`.
    async fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}
