//! # cart-store: Cart State Manager
//!
//! Holds the shopping cart, checks every change against live inventory,
//! persists each accepted change, and tells the shopper what happened.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           cart-store                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         CartStore                                 │  │
//! │  │  add_product · remove_product · update_product_amount             │  │
//! │  │  cart · with_cart · subscribe                                     │  │
//! │  └───────┬───────────────────────┬───────────────────────┬──────────┘  │
//! │          │                       │                       │              │
//! │          ▼                       ▼                       ▼              │
//! │  ┌───────────────┐      ┌────────────────┐      ┌────────────────┐     │
//! │  │   Inventory   │      │  CartStorage   │      │    Notifier    │     │
//! │  │               │      │                │      │                │     │
//! │  │ HttpInventory │      │ SqliteStorage  │      │ Tracing        │     │
//! │  │ InMemory      │      │ MemoryStorage  │      │ Channel, NoOp  │     │
//! │  └───────────────┘      └────────────────┘      └────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - At most one line item per product.
//! - Every line item quantity is at least 1.
//! - After a successful operation, storage holds exactly the current cart.
//! - No operation pushes a quantity above the stock reported at that moment.
//!   Mutations are serialized, so this holds for concurrent callers too.

pub mod error;
pub mod inventory;
pub mod notify;
pub mod storage;
pub mod store;

pub use error::{
    CartError, CartErrorKind, CartResult, InventoryError, InventoryResult, Operation,
    StorageError, StorageResult,
};
pub use inventory::{HttpInventory, InMemoryInventory, Inventory};
pub use notify::{
    ChannelNotifier, NoOpNotifier, Notice, NoticeLevel, Notifier, TracingNotifier,
    PRODUCT_ADDED_MESSAGE,
};
pub use storage::{CartStorage, MemoryStorage, SqliteStorage};
pub use store::{CartStore, CartStoreBuilder, Mutation, StoreConfig, UpdateProductAmount};
