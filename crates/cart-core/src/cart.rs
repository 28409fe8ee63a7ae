//! # Cart
//!
//! The cart value and its pure transitions.
//!
//! ## Transitions Return New Carts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  Store Operation           Transition                 Result            │
//! │  ───────────────           ──────────                 ──────            │
//! │                                                                         │
//! │  add (new product) ──────► with_new_item(&p) ──────► Some(S′) / None   │
//! │                                                                         │
//! │  add (in cart) ──────────► with_incremented(id) ───► Some(S′) / None   │
//! │                                                                         │
//! │  update amount ──────────► with_quantity(id, n) ───► Some(S′) / None   │
//! │                                                                         │
//! │  remove ─────────────────► without(id) ────────────► Some(S′) / None   │
//! │                                                                         │
//! │  The receiver (S) is never touched. The store persists S′ and only     │
//! │  then swaps it in, so a failed write leaves S in place.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};
use crate::MIN_ITEM_QUANTITY;

/// An item in the shopping cart.
///
/// ## Design Notes
/// The product metadata is a frozen copy taken when the product was first
/// added. Later increments or quantity changes don't refresh it, so the cart
/// keeps displaying what the shopper originally saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Inventory identifier
    pub product_id: ProductId,

    /// Product title at time of adding (frozen)
    pub title: String,

    /// Price in cents at time of adding (frozen)
    pub unit_price_cents: i64,

    /// Image reference at time of adding (frozen)
    pub image: String,

    /// Quantity in cart, always >= 1
    pub quantity: i64,

    /// When this item was added to cart
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line item from a product and quantity, freezing its metadata.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id,
            title: product.title.clone(),
            unit_price_cents: product.price_cents,
            image: product.image.clone(),
            quantity,
            added_at: Utc::now(),
        }
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product increments)
/// - Quantity is always >= 1
/// - Items keep insertion order
///
/// Serialized transparently as the array of its items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from items that have already been validated.
    ///
    /// Only [`crate::snapshot::decode`] should need this.
    pub(crate) fn from_validated(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Finds the line item for a product.
    pub fn find(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Whether the product has a line item.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    /// Returns a cart with a new line item (quantity 1) appended.
    ///
    /// Returns `None` if the product is already in the cart.
    pub fn with_new_item(&self, product: &Product) -> Option<Cart> {
        if self.contains(product.id) {
            return None;
        }

        let mut items = self.items.clone();
        items.push(LineItem::from_product(product, MIN_ITEM_QUANTITY));
        Some(Cart { items })
    }

    /// Returns a cart with the product's quantity increased by one.
    ///
    /// Returns `None` if the product is not in the cart or its quantity is
    /// already `i64::MAX`.
    pub fn with_incremented(&self, product_id: ProductId) -> Option<Cart> {
        let quantity = self.find(product_id)?.quantity.checked_add(1)?;
        self.with_quantity(product_id, quantity)
    }

    /// Returns a cart with the product's quantity set to exactly `quantity`.
    ///
    /// Returns `None` if the product is not in the cart or the quantity is
    /// below one.
    pub fn with_quantity(&self, product_id: ProductId, quantity: i64) -> Option<Cart> {
        if quantity < MIN_ITEM_QUANTITY || !self.contains(product_id) {
            return None;
        }

        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id == product_id {
                    LineItem {
                        quantity,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();

        Some(Cart { items })
    }

    /// Returns a cart without the product's line item.
    ///
    /// Returns `None` if the product is not in the cart.
    pub fn without(&self, product_id: ProductId) -> Option<Cart> {
        if !self.contains(product_id) {
            return None;
        }

        let items = self
            .items
            .iter()
            .filter(|i| i.product_id != product_id)
            .cloned()
            .collect();

        Some(Cart { items })
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0, |total, i| total.saturating_add(i.quantity))
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
