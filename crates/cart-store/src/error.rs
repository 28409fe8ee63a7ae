//! # Cart Store Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Inventory     │  │    Storage      │  │       CartError         │ │
//! │  │                 │  │                 │  │  (what callers see)     │ │
//! │  │  NotFound       │  │  Backend        │  │                         │ │
//! │  │  Status         │  │  Encode         │  │  OutOfStock             │ │
//! │  │  Transport      │  │  Unavailable    │  │  ProductNotInCart       │ │
//! │  │  Decode         │  │                 │  │  InvalidQuantity        │ │
//! │  │  Unavailable    │  │                 │  │  OperationFailed        │ │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │           │                    │                        ▲               │
//! │           └────────────────────┴─── OperationFailed ────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CartError` is handled at the operation boundary: logged, turned
//! into one [`Notice`](crate::notify::Notice), and returned. None of them
//! leave the cart changed.

use std::fmt;

use cart_core::ProductId;
use cart_db::DbError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Operation
// =============================================================================

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add product",
            Operation::Remove => "remove product",
            Operation::Update => "update product quantity",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Machine-readable discriminant of a [`CartError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartErrorKind {
    OutOfStock,
    ProductNotInCart,
    InvalidQuantity,
    OperationFailed,
}

/// Why a cart mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The resulting quantity would exceed the stock reported right now.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: shoe x1, inventory: 1 left
    ///      │
    ///      ▼
    /// add_product(shoe) → requested 2
    ///      │
    ///      ▼
    /// OutOfStock { available: 1, requested: 2 }
    ///      │
    ///      ▼
    /// Notice: "Requested quantity is out of stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Remove or update targeted a product that has no line item.
    #[error("Cannot {operation}: product {product_id} is not in the cart")]
    ProductNotInCart {
        product_id: ProductId,
        operation: Operation,
    },

    /// Update asked for fewer than one unit.
    #[error("Invalid quantity {amount} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, amount: i64 },

    /// Inventory or storage fault while performing the operation.
    #[error("Failed to {operation}: {reason}")]
    OperationFailed { operation: Operation, reason: String },
}

impl CartError {
    /// Wraps a lower-level fault.
    pub fn failed(operation: Operation, reason: impl fmt::Display) -> Self {
        CartError::OperationFailed {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> CartErrorKind {
        match self {
            CartError::OutOfStock { .. } => CartErrorKind::OutOfStock,
            CartError::ProductNotInCart { .. } => CartErrorKind::ProductNotInCart,
            CartError::InvalidQuantity { .. } => CartErrorKind::InvalidQuantity,
            CartError::OperationFailed { .. } => CartErrorKind::OperationFailed,
        }
    }

    /// Text shown to the shopper.
    ///
    /// Deliberately coarser than `Display`: missing items and internal
    /// faults read the same, per operation.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::InvalidQuantity { .. } => "Quantity must be at least 1",
            CartError::ProductNotInCart { operation, .. }
            | CartError::OperationFailed { operation, .. } => match operation {
                Operation::Add => "Failed to add product",
                Operation::Remove => "Failed to remove product",
                Operation::Update => "Failed to update product quantity",
            },
        }
    }
}

/// Result of a cart mutation.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Inventory Error
// =============================================================================

/// Inventory lookup failures.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory has no such product (or stock record).
    #[error("{resource} {product_id} not found")]
    NotFound {
        resource: &'static str,
        product_id: ProductId,
    },

    /// The inventory answered with a non-success status.
    #[error("Inventory returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The request never got a response.
    #[error("Inventory request failed: {0}")]
    Transport(String),

    /// The response body was not what we expected.
    #[error("Invalid inventory response: {0}")]
    Decode(String),

    /// The inventory is switched off (in-memory inventory only).
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InventoryError::Decode(err.to_string())
        } else {
            InventoryError::Transport(err.to_string())
        }
    }
}

/// Result type for inventory lookups.
pub type InventoryResult<T> = Result<T, InventoryError>;

// =============================================================================
// Storage Error
// =============================================================================

/// Snapshot persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite backend failure.
    #[error("Storage backend error: {0}")]
    Backend(#[from] DbError),

    /// The cart could not be serialized.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The medium refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Unit Tests
// =============================================================================
