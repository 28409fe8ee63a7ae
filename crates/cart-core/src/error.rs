//! # Error Types
//!
//! Domain-specific error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core errors (this file)                                          │
//! │  ├── ValidationError  - A value breaks a cart rule                     │
//! │  └── SnapshotError    - A stored snapshot can't be trusted             │
//! │                                                                         │
//! │  cart-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  cart-store errors                                                     │
//! │  ├── InventoryError   - Inventory lookups                              │
//! │  ├── StorageError     - Snapshot read/write                            │
//! │  └── CartError        - What the consumer sees (4 kinds)               │
//! │                                                                         │
//! │  Flow: InventoryError / StorageError → CartError → Notice              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Validation Error
// =============================================================================

/// A value that breaks one of the cart's rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Quantity below the floor of one unit.
    #[error("quantity must be at least {min}, got {value}")]
    QuantityTooSmall { value: i64, min: i64 },

    /// Price below zero.
    #[error("price must not be negative, got {value}")]
    NegativePrice { value: i64 },

    /// Two line items for the same product.
    #[error("product {product_id} appears more than once")]
    DuplicateProduct { product_id: ProductId },
}

// =============================================================================
// Snapshot Error
// =============================================================================

/// Why a persisted snapshot was rejected on restore.
///
/// Any of these means the blob is treated as absent and the cart starts empty.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, wrong shape, or a required field is missing.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Well-formed JSON that violates a cart invariant.
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] ValidationError),
}

/// Convenience type alias for snapshot decoding.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// =============================================================================
// Unit Tests
// =============================================================================
