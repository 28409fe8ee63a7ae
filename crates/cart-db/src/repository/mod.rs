//! # Repository Module
//!
//! Repositories keep SQL in one place behind a small async API.
//!
//! ```text
//! CartStore commit
//!      │
//!      │  db.key_values().put(key, snapshot)
//!      ▼
//! KeyValueRepository
//! ├── get(&self, key)
//! ├── put(&self, key, value)
//! └── delete(&self, key)
//!      │
//!      ▼
//! kv_store table
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KeyValueRepository`] - Whole-value reads and overwrites by key

pub mod kv;
