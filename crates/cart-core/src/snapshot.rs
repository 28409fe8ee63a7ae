//! # Snapshot Format
//!
//! Encoding of a whole [`Cart`] for durable storage.
//!
//! The snapshot is the JSON array of line items, written in full after every
//! successful mutation:
//!
//! ```json
//! [
//!   {
//!     "productId": 1,
//!     "title": "Running Shoe",
//!     "unitPriceCents": 17990,
//!     "image": "https://cdn.example.com/1.jpg",
//!     "quantity": 2,
//!     "addedAt": "2024-05-01T12:00:00Z"
//!   }
//! ]
//! ```
//!
//! Decoding never trusts the blob: serde enforces the shape, then every
//! item is re-validated. Any failure rejects the whole snapshot.

use crate::cart::{Cart, LineItem};
use crate::error::SnapshotResult;
use crate::validation::{validate_line_item, validate_unique_products};

/// Serializes a cart into its snapshot string.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Parses and validates a snapshot string.
///
/// ## Example
/// ```rust
/// use cart_core::snapshot;
///
/// assert!(snapshot::decode("[]").unwrap().is_empty());
/// assert!(snapshot::decode("{\"not\":\"a cart\"}").is_err());
/// ```
pub fn decode(raw: &str) -> SnapshotResult<Cart> {
    let items: Vec<LineItem> = serde_json::from_str(raw)?;

    for item in &items {
        validate_line_item(item)?;
    }
    validate_unique_products(&items)?;

    Ok(Cart::from_validated(items))
}
