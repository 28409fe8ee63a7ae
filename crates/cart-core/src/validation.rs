//! # Validation Module
//!
//! Checks that keep the cart's invariants intact.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CartStore operation                                          │
//! │  ├── amount < 1 rejected before inventory is queried                   │
//! │  └── stock ceiling checked against the live StockRecord                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart transitions (cart.rs)                                   │
//! │  └── refuse to build a Cart that breaks I1/I2                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Snapshot restore (snapshot.rs)                               │
//! │  └── THIS MODULE: every stored item re-checked, fail closed            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::cart::LineItem;
use crate::error::ValidationError;
use crate::MIN_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a line item quantity.
///
/// ## Example
/// ```rust
/// use cart_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < MIN_ITEM_QUANTITY {
        return Err(ValidationError::QuantityTooSmall {
            value: qty,
            min: MIN_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativePrice { value: cents });
    }

    Ok(())
}

/// Validates a single stored line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_price_cents(item.unit_price_cents)?;
    Ok(())
}

/// Validates that no product appears twice.
pub fn validate_unique_products(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.product_id) {
            return Err(ValidationError::DuplicateProduct {
                product_id: item.product_id,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
