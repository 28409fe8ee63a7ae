//! # cart-db: Database Layer for the cart
//!
//! SQLite-backed key-value storage, used as the durable medium for the cart
//! snapshot.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Persistence Path                            │
//! │                                                                         │
//! │  CartStore commit (cart-store, SqliteStorage)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cart-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (kv.rs)      │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ KeyValueRepo  │    │ 001_kv.sql   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (e.g. ~/.local/share/cart/cart.db)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cart_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/cart.db")).await?;
//!
//! db.key_values().put("@RocketShoes:cart", "[]").await?;
//! let raw = db.key_values().get("@RocketShoes:cart").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;
