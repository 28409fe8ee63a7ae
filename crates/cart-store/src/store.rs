//! # Cart Store
//!
//! The single owner of the cart.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CartStore Mutation                              │
//! │                                                                         │
//! │  add_product / remove_product / update_product_amount                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_gate.lock()  ← one mutation at a time                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate against live inventory ──── rejected ──► Notice (error)       │
//! │       │                                              Cart unchanged     │
//! │       ▼                                                                 │
//! │  commit(S′)                                                             │
//! │    1. snapshot::encode(S′)                                              │
//! │    2. storage.write(key, json) ───── failed ──► OperationFailed         │
//! │    3. state.send_replace(S′)   ← readers and subscribers see S′         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Notice (info) on new item only                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory cart never runs ahead of storage: S′ is published only
//! after it has been written.
//!
//! ## Example
//! ```rust,ignore
//! let store = CartStore::builder(inventory, storage)
//!     .notifier(Arc::new(TracingNotifier))
//!     .restore()
//!     .await;
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.with_cart(|cart| println!("{} items", cart.item_count()));
//! ```

use std::fmt;
use std::sync::Arc;

use cart_core::{snapshot, validation, Cart, ProductId, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::error::{CartError, CartResult, Operation, StorageError};
use crate::inventory::Inventory;
use crate::notify::{Notice, Notifier, TracingNotifier, PRODUCT_ADDED_MESSAGE};
use crate::storage::CartStorage;

// =============================================================================
// Configuration
// =============================================================================

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage namespace for the cart snapshot.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

// =============================================================================
// Requests & Outcomes
// =============================================================================

/// Sets a line item's quantity to an exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// What a successful operation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// New line item with quantity 1.
    Added,
    /// Existing line item went up by one.
    Incremented { quantity: i64 },
    /// Line item deleted.
    Removed,
    /// Line item set to an exact quantity.
    QuantitySet { quantity: i64 },
    /// New product with no stock: nothing happened and nothing was said.
    Unchanged,
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`CartStore`] from its collaborators.
pub struct CartStoreBuilder {
    inventory: Arc<dyn Inventory>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
}

impl CartStoreBuilder {
    /// Replaces the default [`TracingNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    /// Loads the persisted cart and returns a ready store.
    pub async fn restore(self) -> CartStore {
        CartStore::restore(self.inventory, self.storage, self.notifier, self.config).await
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Owner of the cart and the only way to change it.
pub struct CartStore {
    inventory: Arc<dyn Inventory>,
    storage: Arc<dyn CartStorage>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,

    /// Current committed cart.
    state: watch::Sender<Cart>,

    /// Held from the first inventory lookup through commit.
    write_gate: Mutex<()>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("items", &self.state.borrow().item_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Starts building a store over the given inventory and storage.
    pub fn builder(
        inventory: Arc<dyn Inventory>,
        storage: Arc<dyn CartStorage>,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            inventory,
            storage,
            notifier: Arc::new(TracingNotifier),
            config: StoreConfig::default(),
        }
    }

    /// Creates a store whose initial cart is the persisted snapshot.
    ///
    /// An absent, unreadable, malformed or invalid snapshot yields an empty
    /// cart. The restored cart is not re-checked against inventory.
    pub async fn restore(
        inventory: Arc<dyn Inventory>,
        storage: Arc<dyn CartStorage>,
        notifier: Arc<dyn Notifier>,
        config: StoreConfig,
    ) -> Self {
        let cart = load_snapshot(storage.as_ref(), &config.storage_key).await;
        let (state, _) = watch::channel(cart);

        CartStore {
            inventory,
            storage,
            notifier,
            config,
            state,
            write_gate: Mutex::new(()),
        }
    }

    // =========================================================================
    // Read Surface
    // =========================================================================

    /// Returns a copy of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Runs `f` against the current cart without cloning it.
    ///
    /// Keep `f` short: commits wait for it to finish.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.state.borrow())
    }

    /// Receiver that observes every committed cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// A product not yet in the cart is looked up and appended with quantity
    /// 1 if any stock exists. A product already in the cart is incremented if
    /// stock exceeds its current quantity.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Mutation> {
        debug!(%product_id, "add_product");
        let _gate = self.write_gate.lock().await;
        let outcome = self.try_add(product_id).await;
        self.report(Operation::Add, outcome)
    }

    /// Deletes a product's line item.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Mutation> {
        debug!(%product_id, "remove_product");
        let _gate = self.write_gate.lock().await;
        let outcome = self.try_remove(product_id).await;
        self.report(Operation::Remove, outcome)
    }

    /// Sets a line item's quantity to exactly `amount`.
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> CartResult<Mutation> {
        debug!(product_id = %request.product_id, amount = request.amount, "update_product_amount");
        let _gate = self.write_gate.lock().await;
        let outcome = self.try_update(request).await;
        self.report(Operation::Update, outcome)
    }

    async fn try_add(&self, product_id: ProductId) -> CartResult<Mutation> {
        let current = self.cart();

        let Some(existing) = current.find(product_id) else {
            let product = self
                .inventory
                .product(product_id)
                .await
                .map_err(|e| CartError::failed(Operation::Add, e))?;
            let stock = self
                .inventory
                .stock(product_id)
                .await
                .map_err(|e| CartError::failed(Operation::Add, e))?;

            if !stock.covers(1) {
                debug!(%product_id, available = stock.amount, "No stock for new product, nothing added");
                return Ok(Mutation::Unchanged);
            }

            let next = current
                .with_new_item(&product)
                .ok_or_else(|| CartError::failed(Operation::Add, "line item appeared mid-operation"))?;
            self.commit(next, Operation::Add).await?;
            return Ok(Mutation::Added);
        };

        let stock = self
            .inventory
            .stock(product_id)
            .await
            .map_err(|e| CartError::failed(Operation::Add, e))?;

        let requested = existing.quantity.saturating_add(1);
        if existing.quantity == i64::MAX || !stock.covers(requested) {
            return Err(CartError::OutOfStock {
                product_id,
                available: stock.amount,
                requested,
            });
        }

        let next = current
            .with_incremented(product_id)
            .ok_or_else(|| CartError::failed(Operation::Add, "line item vanished mid-operation"))?;
        self.commit(next, Operation::Add).await?;
        Ok(Mutation::Incremented {
            quantity: requested,
        })
    }

    async fn try_remove(&self, product_id: ProductId) -> CartResult<Mutation> {
        let next = self
            .with_cart(|cart| cart.without(product_id))
            .ok_or(CartError::ProductNotInCart {
                product_id,
                operation: Operation::Remove,
            })?;

        self.commit(next, Operation::Remove).await?;
        Ok(Mutation::Removed)
    }

    async fn try_update(&self, request: UpdateProductAmount) -> CartResult<Mutation> {
        let UpdateProductAmount { product_id, amount } = request;

        if validation::validate_quantity(amount).is_err() {
            return Err(CartError::InvalidQuantity { product_id, amount });
        }

        let stock = self
            .inventory
            .stock(product_id)
            .await
            .map_err(|e| CartError::failed(Operation::Update, e))?;

        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                available: stock.amount,
                requested: amount,
            });
        }

        let next = self
            .with_cart(|cart| cart.with_quantity(product_id, amount))
            .ok_or(CartError::ProductNotInCart {
                product_id,
                operation: Operation::Update,
            })?;

        self.commit(next, Operation::Update).await?;
        Ok(Mutation::QuantitySet { quantity: amount })
    }

    /// Persists `next`, then publishes it.
    async fn commit(&self, next: Cart, operation: Operation) -> CartResult<()> {
        let raw = snapshot::encode(&next)
            .map_err(|e| CartError::failed(operation, StorageError::from(e)))?;

        if let Err(e) = self.storage.write(&self.config.storage_key, &raw).await {
            error!(
                key = %self.config.storage_key,
                operation = %operation,
                error = %e,
                "Failed to persist cart"
            );
            return Err(CartError::failed(operation, e));
        }

        info!(
            operation = %operation,
            items = next.item_count(),
            quantity = next.total_quantity(),
            "Cart committed"
        );
        self.state.send_replace(next);
        Ok(())
    }

    /// Emits the notice for an outcome and passes it through.
    fn report(&self, operation: Operation, outcome: CartResult<Mutation>) -> CartResult<Mutation> {
        match &outcome {
            Ok(Mutation::Added) => self.notifier.notify(Notice::info(PRODUCT_ADDED_MESSAGE)),
            Ok(mutation) => debug!(operation = %operation, ?mutation, "Cart operation complete"),
            Err(err) => {
                warn!(operation = %operation, kind = ?err.kind(), error = %err, "Cart operation rejected");
                self.notifier.notify(Notice::from_error(err));
            }
        }
        outcome
    }
}

async fn load_snapshot(storage: &dyn CartStorage, key: &str) -> Cart {
    match storage.read(key).await {
        Ok(Some(raw)) => match snapshot::decode(&raw) {
            Ok(cart) => {
                info!(key = %key, items = cart.item_count(), "Cart restored");
                cart
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding stored cart, starting empty");
                Cart::new()
            }
        },
        Ok(None) => {
            debug!(key = %key, "No stored cart, starting empty");
            Cart::new()
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Could not read stored cart, starting empty");
            Cart::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cart_core::Product;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::error::CartErrorKind;
    use crate::inventory::InMemoryInventory;
    use crate::notify::{ChannelNotifier, NoticeLevel};
    use crate::storage::MemoryStorage;

    fn shoe(id: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price_cents: 13990 + id as i64,
            image: format!("https://cdn.example.com/tenis-{id}.jpg"),
        }
    }

    fn id(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    fn cart_of(items: &[(u64, i64)]) -> Cart {
        items.iter().fold(Cart::new(), |cart, &(raw, qty)| {
            cart.with_new_item(&shoe(raw))
                .unwrap()
                .with_quantity(id(raw), qty)
                .unwrap()
        })
    }

    struct Harness {
        store: CartStore,
        inventory: Arc<InMemoryInventory>,
        storage: Arc<MemoryStorage>,
        notices: UnboundedReceiver<Notice>,
    }

    impl Harness {
        /// `stock` lists products known to inventory; `cart` seeds storage.
        async fn new(stock: &[(u64, i64)], cart: &[(u64, i64)]) -> Self {
            let inventory = Arc::new(InMemoryInventory::new());
            for &(raw, amount) in stock {
                inventory.insert(shoe(raw), amount);
            }
            Self::with_inventory(inventory, cart).await
        }

        async fn with_inventory(inventory: Arc<InMemoryInventory>, cart: &[(u64, i64)]) -> Self {
            let storage = Arc::new(MemoryStorage::new().with_entry(
                DEFAULT_STORAGE_KEY,
                snapshot::encode(&cart_of(cart)).unwrap(),
            ));
            let (notifier, notices) = ChannelNotifier::channel();

            let store = CartStore::builder(inventory.clone(), storage.clone())
                .notifier(Arc::new(notifier))
                .restore()
                .await;

            Harness {
                store,
                inventory,
                storage,
                notices,
            }
        }

        fn notices(&mut self) -> Vec<Notice> {
            let mut out = Vec::new();
            while let Ok(notice) = self.notices.try_recv() {
                out.push(notice);
            }
            out
        }

        fn persisted(&self) -> Cart {
            let raw = self.storage.get(DEFAULT_STORAGE_KEY).unwrap();
            snapshot::decode(&raw).unwrap()
        }

        fn quantities(&self) -> Vec<(u64, i64)> {
            self.store.with_cart(|cart| {
                cart.items()
                    .iter()
                    .map(|item| (item.product_id.get(), item.quantity))
                    .collect()
            })
        }
    }

    fn single_error(notices: &[Notice]) -> &Notice {
        assert_eq!(notices.len(), 1, "expected exactly one notice: {notices:?}");
        assert_eq!(notices[0].level, NoticeLevel::Error);
        &notices[0]
    }

    // -------------------------------------------------------------------------
    // add_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_new_product_with_stock() {
        let mut h = Harness::new(&[(1, 5)], &[]).await;

        let result = h.store.add_product(id(1)).await;

        assert_eq!(result, Ok(Mutation::Added));
        assert_eq!(h.quantities(), vec![(1, 1)]);

        let item = h.store.cart().find(id(1)).cloned().unwrap();
        assert_eq!(item.title, "Tênis 1");
        assert_eq!(item.unit_price_cents, 13991);

        assert_eq!(h.persisted(), h.store.cart());
        assert_eq!(h.storage.write_count(), 1);
        assert_eq!(h.notices(), vec![Notice::info(PRODUCT_ADDED_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_silently() {
        let mut h = Harness::new(&[(1, 3)], &[(1, 2)]).await;

        let result = h.store.add_product(id(1)).await;

        assert_eq!(result, Ok(Mutation::Incremented { quantity: 3 }));
        assert_eq!(h.quantities(), vec![(1, 3)]);
        assert_eq!(h.persisted(), h.store.cart());
        assert!(h.notices().is_empty());
        assert_eq!(h.inventory.product_requests(), 0);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_rejected() {
        let mut h = Harness::new(&[(1, 1)], &[(1, 1)]).await;
        let before = h.store.cart();

        let result = h.store.add_product(id(1)).await;

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id: id(1),
                available: 1,
                requested: 2,
            })
        );
        assert_eq!(h.store.cart(), before);
        assert_eq!(h.storage.write_count(), 0);

        let notices = h.notices();
        let notice = single_error(&notices);
        assert_eq!(notice.message, "Requested quantity is out of stock");
        assert_eq!(notice.kind, Some(CartErrorKind::OutOfStock));
    }

    #[tokio::test]
    async fn test_add_new_product_without_stock_is_silent_noop() {
        let mut h = Harness::new(&[(1, 0)], &[]).await;

        let result = h.store.add_product(id(1)).await;

        assert_eq!(result, Ok(Mutation::Unchanged));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.write_count(), 0);
        assert!(h.notices().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_adds_stop_at_stock() {
        let mut h = Harness::new(&[(1, 3)], &[]).await;

        let mut results = Vec::new();
        for _ in 0..5 {
            results.push(h.store.add_product(id(1)).await);
        }

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
        assert!(results[3..]
            .iter()
            .all(|r| matches!(r, Err(CartError::OutOfStock { .. }))));
        assert_eq!(h.quantities(), vec![(1, 3)]);

        let notices = h.notices();
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[0], Notice::info(PRODUCT_ADDED_MESSAGE));
        assert!(notices[1..].iter().all(Notice::is_error));
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let mut h = Harness::new(&[], &[]).await;

        let result = h.store.add_product(id(42)).await;

        assert!(matches!(
            result,
            Err(CartError::OperationFailed {
                operation: Operation::Add,
                ..
            })
        ));
        assert!(h.store.cart().is_empty());
        assert_eq!(single_error(&h.notices()).message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_add_new_product_stock_lookup_fails() {
        let mut h = Harness::new(&[], &[]).await;
        // product metadata only, no stock record
        h.inventory.update_product(shoe(1));

        let result = h.store.add_product(id(1)).await;

        assert!(matches!(
            result,
            Err(CartError::OperationFailed {
                operation: Operation::Add,
                ..
            })
        ));
        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.write_count(), 0);
        assert_eq!(h.inventory.product_requests(), 1);
        assert_eq!(h.inventory.stock_requests(), 1);
        assert_eq!(single_error(&h.notices()).message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_add_at_max_quantity_is_rejected() {
        let mut h = Harness::new(&[(1, 5)], &[(1, i64::MAX)]).await;
        let before = h.store.cart();

        let result = h.store.add_product(id(1)).await;

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id: id(1),
                available: 5,
                requested: i64::MAX,
            })
        );
        assert_eq!(h.store.cart(), before);
        assert_eq!(h.storage.write_count(), 0);
        assert_eq!(single_error(&h.notices()).kind, Some(CartErrorKind::OutOfStock));
    }

    #[tokio::test]
    async fn test_add_with_inventory_offline_fails() {
        let mut h = Harness::new(&[(1, 5)], &[(1, 1)]).await;
        h.inventory.set_offline(true);

        let result = h.store.add_product(id(1)).await;

        assert_eq!(result.unwrap_err().kind(), CartErrorKind::OperationFailed);
        assert_eq!(h.quantities(), vec![(1, 1)]);
        assert_eq!(single_error(&h.notices()).message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_line_item_keeps_metadata_from_first_add() {
        let h = Harness::new(&[(1, 5)], &[]).await;
        h.store.add_product(id(1)).await.unwrap();

        h.inventory.update_product(Product {
            title: "Renamed".into(),
            price_cents: 1,
            ..shoe(1)
        });
        h.store.add_product(id(1)).await.unwrap();

        let item = h.store.cart().find(id(1)).cloned().unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, "Tênis 1");
        assert_eq!(item.unit_price_cents, 13991);
    }

    #[tokio::test]
    async fn test_new_items_append_in_order() {
        let h = Harness::new(&[(1, 5), (2, 5), (3, 5)], &[(2, 1)]).await;

        h.store.add_product(id(3)).await.unwrap();
        h.store.add_product(id(1)).await.unwrap();

        assert_eq!(h.quantities(), vec![(2, 1), (3, 1), (1, 1)]);
    }

    // -------------------------------------------------------------------------
    // remove_product
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remove_product() {
        let mut h = Harness::new(&[], &[(1, 2), (2, 1)]).await;

        let result = h.store.remove_product(id(1)).await;

        assert_eq!(result, Ok(Mutation::Removed));
        assert_eq!(h.quantities(), vec![(2, 1)]);
        assert_eq!(h.persisted(), h.store.cart());
        assert!(h.notices().is_empty());
    }

    #[tokio::test]
    async fn test_remove_last_product_persists_empty_cart() {
        let h = Harness::new(&[], &[(1, 2)]).await;

        h.store.remove_product(id(1)).await.unwrap();

        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.get(DEFAULT_STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove_missing_product_rejected() {
        let mut h = Harness::new(&[], &[(1, 1)]).await;

        let result = h.store.remove_product(id(2)).await;

        assert_eq!(
            result,
            Err(CartError::ProductNotInCart {
                product_id: id(2),
                operation: Operation::Remove,
            })
        );
        assert_eq!(h.quantities(), vec![(1, 1)]);
        assert_eq!(h.storage.write_count(), 0);
        assert_eq!(single_error(&h.notices()).message, "Failed to remove product");
    }

    #[tokio::test]
    async fn test_remove_never_consults_inventory() {
        let h = Harness::new(&[], &[(1, 1)]).await;
        h.inventory.set_offline(true);

        assert_eq!(h.store.remove_product(id(1)).await, Ok(Mutation::Removed));
        assert_eq!(h.inventory.stock_requests(), 0);
    }

    // -------------------------------------------------------------------------
    // update_product_amount
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let mut h = Harness::new(&[(1, 10)], &[(1, 1)]).await;

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(1),
                amount: 5,
            })
            .await;

        assert_eq!(result, Ok(Mutation::QuantitySet { quantity: 5 }));
        assert_eq!(h.quantities(), vec![(1, 5)]);
        assert_eq!(h.persisted(), h.store.cart());
        assert!(h.notices().is_empty());
    }

    #[tokio::test]
    async fn test_update_to_full_stock_allowed() {
        let h = Harness::new(&[(1, 4)], &[(1, 1)]).await;

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(1),
                amount: 4,
            })
            .await;

        assert_eq!(result, Ok(Mutation::QuantitySet { quantity: 4 }));
    }

    #[tokio::test]
    async fn test_update_below_one_short_circuits() {
        let mut h = Harness::new(&[(1, 10)], &[(1, 3)]).await;

        for amount in [0, -2] {
            let result = h
                .store
                .update_product_amount(UpdateProductAmount {
                    product_id: id(1),
                    amount,
                })
                .await;
            assert_eq!(
                result,
                Err(CartError::InvalidQuantity {
                    product_id: id(1),
                    amount,
                })
            );
        }

        assert_eq!(h.quantities(), vec![(1, 3)]);
        assert_eq!(h.inventory.stock_requests(), 0);
        assert_eq!(h.storage.write_count(), 0);

        let notices = h.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices
            .iter()
            .all(|n| n.kind == Some(CartErrorKind::InvalidQuantity)));
    }

    #[tokio::test]
    async fn test_update_beyond_stock_rejected() {
        let mut h = Harness::new(&[(1, 10)], &[(1, 1)]).await;

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(1),
                amount: 11,
            })
            .await;

        assert_eq!(
            result,
            Err(CartError::OutOfStock {
                product_id: id(1),
                available: 10,
                requested: 11,
            })
        );
        assert_eq!(h.quantities(), vec![(1, 1)]);
        assert_eq!(
            single_error(&h.notices()).message,
            "Requested quantity is out of stock"
        );
    }

    #[tokio::test]
    async fn test_update_missing_product_rejected() {
        let mut h = Harness::new(&[(2, 10)], &[(1, 1)]).await;

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(2),
                amount: 3,
            })
            .await;

        assert_eq!(
            result,
            Err(CartError::ProductNotInCart {
                product_id: id(2),
                operation: Operation::Update,
            })
        );
        assert_eq!(
            single_error(&h.notices()).message,
            "Failed to update product quantity"
        );
    }

    #[tokio::test]
    async fn test_update_checks_stock_before_membership() {
        let h = Harness::new(&[(2, 1)], &[(1, 1)]).await;

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(2),
                amount: 5,
            })
            .await;

        assert_eq!(result.unwrap_err().kind(), CartErrorKind::OutOfStock);
    }

    #[tokio::test]
    async fn test_update_with_inventory_offline_fails() {
        let mut h = Harness::new(&[(1, 10)], &[(1, 1)]).await;
        h.inventory.set_offline(true);

        let result = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: id(1),
                amount: 2,
            })
            .await;

        assert!(matches!(
            result,
            Err(CartError::OperationFailed {
                operation: Operation::Update,
                ..
            })
        ));
        assert_eq!(
            single_error(&h.notices()).message,
            "Failed to update product quantity"
        );
    }

    // -------------------------------------------------------------------------
    // Commit & persistence
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_storage_failure_leaves_cart_unchanged() {
        let mut h = Harness::new(&[(1, 5), (2, 5)], &[(1, 1)]).await;
        let rx = h.store.subscribe();
        h.storage.set_fail_writes(true);

        let add = h.store.add_product(id(2)).await;
        let remove = h.store.remove_product(id(1)).await;

        assert!(matches!(
            add,
            Err(CartError::OperationFailed { operation: Operation::Add, .. })
        ));
        assert!(matches!(
            remove,
            Err(CartError::OperationFailed { operation: Operation::Remove, .. })
        ));
        assert_eq!(h.quantities(), vec![(1, 1)]);
        assert_eq!(h.persisted(), h.store.cart());
        assert!(!rx.has_changed().unwrap());

        let notices = h.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].message, "Failed to add product");
        assert_eq!(notices[1].message, "Failed to remove product");
    }

    #[tokio::test]
    async fn test_every_commit_is_persisted() {
        let h = Harness::new(&[(1, 5), (2, 5)], &[]).await;

        h.store.add_product(id(1)).await.unwrap();
        assert_eq!(h.persisted(), h.store.cart());
        h.store.add_product(id(2)).await.unwrap();
        assert_eq!(h.persisted(), h.store.cart());
        h.store
            .update_product_amount(UpdateProductAmount {
                product_id: id(2),
                amount: 4,
            })
            .await
            .unwrap();
        assert_eq!(h.persisted(), h.store.cart());
        h.store.remove_product(id(1)).await.unwrap();
        assert_eq!(h.persisted(), h.store.cart());

        assert_eq!(h.storage.write_count(), 4);
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let h = Harness::new(&[(1, 5)], &[]).await;
        let mut rx = h.store.subscribe();

        h.store.add_product(id(1)).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count(), 1);
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let inventory = Arc::new(InMemoryInventory::new().with_product(shoe(1), 2));
        let storage = Arc::new(MemoryStorage::new());

        let store = CartStore::builder(inventory, storage.clone())
            .notifier(Arc::new(crate::notify::NoOpNotifier))
            .storage_key("shop:cart")
            .restore()
            .await;
        store.add_product(id(1)).await.unwrap();

        assert_eq!(store.storage_key(), "shop:cart");
        assert!(storage.get("shop:cart").is_some());
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_none());
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_restore_valid_snapshot() {
        let h = Harness::new(&[], &[(3, 2), (1, 1)]).await;
        assert_eq!(h.quantities(), vec![(3, 2), (1, 1)]);
    }

    async fn restore_from(raw: &str) -> Cart {
        let storage = Arc::new(MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, raw));
        CartStore::builder(Arc::new(InMemoryInventory::new()), storage)
            .restore()
            .await
            .cart()
    }

    #[tokio::test]
    async fn test_restore_malformed_snapshot_starts_empty() {
        assert!(restore_from("{not json").await.is_empty());
        assert!(restore_from(r#"{"items": []}"#).await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_invalid_snapshot_starts_empty() {
        let mut bad = serde_json::to_value(cart_of(&[(1, 1)])).unwrap();
        bad[0]["quantity"] = serde_json::json!(0);
        assert!(restore_from(&bad.to_string()).await.is_empty());

        let dup = serde_json::to_value(cart_of(&[(1, 1)])).unwrap();
        let dup = serde_json::json!([dup[0].clone(), dup[0].clone()]);
        assert!(restore_from(&dup.to_string()).await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_without_snapshot_or_readable_storage() {
        let inventory = Arc::new(InMemoryInventory::new());

        let store = CartStore::builder(inventory.clone(), Arc::new(MemoryStorage::new()))
            .restore()
            .await;
        assert!(store.cart().is_empty());

        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, "[]");
        storage.set_fail_reads(true);
        let store = CartStore::builder(inventory, Arc::new(storage))
            .restore()
            .await;
        assert!(store.cart().is_empty());
    }

    // -------------------------------------------------------------------------
    // Concurrency
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_concurrent_adds_respect_stock() {
        let inventory = Arc::new(
            InMemoryInventory::new()
                .with_product(shoe(1), 1)
                .with_latency(Duration::from_millis(10)),
        );
        let h = Harness::with_inventory(inventory, &[]).await;

        let (a, b) = tokio::join!(h.store.add_product(id(1)), h.store.add_product(id(1)));

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(CartError::OutOfStock { .. }))));
        assert_eq!(h.quantities(), vec![(1, 1)]);
        assert_eq!(h.persisted(), h.store.cart());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_store_across_tasks() {
        let inventory = Arc::new(
            InMemoryInventory::new()
                .with_product(shoe(1), 3)
                .with_latency(Duration::from_millis(2)),
        );
        let h = Harness::with_inventory(inventory, &[]).await;
        let store = Arc::new(h.store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add_product(id(1)).await })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 3);
        assert_eq!(store.cart().find(id(1)).unwrap().quantity, 3);
    }
}
