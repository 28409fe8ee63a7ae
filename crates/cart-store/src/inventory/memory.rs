//! In-process inventory for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cart_core::{Product, ProductId, StockRecord};

use super::Inventory;
use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Default)]
struct InventoryState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, i64>,
    offline: bool,
    latency: Option<Duration>,
    product_requests: usize,
    stock_requests: usize,
}

/// Inventory held in a map, with switchable failure and latency.
#[derive(Debug, Default)]
pub struct InMemoryInventory {
    state: Mutex<InventoryState>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with the given stock.
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.insert(product, stock);
        self
    }

    /// Delays every lookup, so concurrent callers interleave.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state().latency = Some(latency);
        self
    }

    pub fn insert(&self, product: Product, stock: i64) {
        let mut state = self.state();
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    pub fn set_stock(&self, id: ProductId, amount: i64) {
        self.state().stock.insert(id, amount);
    }

    /// Replaces catalog metadata without touching stock.
    pub fn update_product(&self, product: Product) {
        self.state().products.insert(product.id, product);
    }

    /// While offline every lookup fails with [`InventoryError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn product_requests(&self) -> usize {
        self.state().product_requests
    }

    pub fn stock_requests(&self) -> usize {
        self.state().stock_requests
    }

    fn state(&self) -> MutexGuard<'_, InventoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self) {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Inventory for InMemoryInventory {
    async fn product(&self, id: ProductId) -> InventoryResult<Product> {
        self.pause().await;

        let mut state = self.state();
        state.product_requests += 1;
        if state.offline {
            return Err(InventoryError::Unavailable("inventory is offline".into()));
        }
        state
            .products
            .get(&id)
            .cloned()
            .ok_or(InventoryError::NotFound {
                resource: "product",
                product_id: id,
            })
    }

    async fn stock(&self, id: ProductId) -> InventoryResult<StockRecord> {
        self.pause().await;

        let mut state = self.state();
        state.stock_requests += 1;
        if state.offline {
            return Err(InventoryError::Unavailable("inventory is offline".into()));
        }
        state
            .stock
            .get(&id)
            .map(|amount| StockRecord::new(id, *amount))
            .ok_or(InventoryError::NotFound {
                resource: "stock",
                product_id: id,
            })
    }
}
