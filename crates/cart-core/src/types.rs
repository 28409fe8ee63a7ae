//! # Domain Types
//!
//! Inventory-facing types shared by the cart and its adapters.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ProductId     │   │    Product      │   │  StockRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  u64 newtype    │   │  id             │   │  product_id     │       │
//! │  │  (transparent)  │   │  title          │   │  amount (live)  │       │
//! │  │                 │   │  price_cents    │   │                 │       │
//! │  │                 │   │  image          │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product` is the metadata the inventory reports; it is copied into a
//! [`LineItem`](crate::cart::LineItem) once, when the product is first added.
//! `StockRecord` is never stored: it is fetched fresh on every mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Product ID
// =============================================================================

/// Inventory identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wraps a raw inventory identifier.
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    /// Returns the raw identifier.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product metadata as reported by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Inventory identifier.
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Image URL or asset reference.
    pub image: String,
}

// =============================================================================
// Stock Record
// =============================================================================

/// Available quantity for a product at the moment it was queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: ProductId,

    /// Units available. May be zero (or negative if the inventory oversold).
    pub amount: i64,
}

impl StockRecord {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        StockRecord { product_id, amount }
    }

    /// Whether `quantity` units fit inside the reported stock.
    #[inline]
    pub fn covers(&self, quantity: i64) -> bool {
        quantity <= self.amount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
