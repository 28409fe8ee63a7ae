//! # Inventory
//!
//! Product metadata and live stock lookups.
//!
//! ```text
//! CartStore
//!    │
//!    ├── inventory.product(id) ──► title, price, image (new line items only)
//!    └── inventory.stock(id)   ──► units available right now
//! ```
//!
//! Stock is never cached: every add and update asks again.

use async_trait::async_trait;
use cart_core::{Product, ProductId, StockRecord};

use crate::error::InventoryResult;

pub mod http;
pub mod memory;

pub use http::HttpInventory;
pub use memory::InMemoryInventory;

/// Source of product metadata and stock levels.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Fetches the product catalog entry.
    async fn product(&self, id: ProductId) -> InventoryResult<Product>;

    /// Fetches current stock for a product.
    async fn stock(&self, id: ProductId) -> InventoryResult<StockRecord>;
}
