//! # cart-core: Pure Cart Logic
//!
//! Types and rules for the shopping cart, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Consumer (CLI / UI)                          │   │
//! │  │    add_product, remove_product, update_product_amount, cart()   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cart-store (CartStore)                       │   │
//! │  │    inventory check ──► compute S′ ──► persist ──► publish       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │ snapshot  │  │ validation│  │   │
//! │  │   │  Product  │  │   Cart    │  │  encode   │  │   rules   │  │   │
//! │  │   │  Stock    │  │ LineItem  │  │  decode   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Inventory-facing types (ProductId, Product, StockRecord)
//! - [`cart`] - Cart and LineItem with pure transition functions
//! - [`snapshot`] - Persisted snapshot format (validated on decode)
//! - [`error`] - Domain error types
//! - [`validation`] - Quantity, price and uniqueness checks
//!
//! ## Example Usage
//!
//! ```rust
//! use cart_core::{Cart, Product, ProductId};
//!
//! let product = Product {
//!     id: ProductId::new(1),
//!     title: "Running Shoe".to_string(),
//!     price_cents: 17990,
//!     image: "https://example.com/shoe.jpg".to_string(),
//! };
//!
//! let cart = Cart::new().with_new_item(&product).unwrap();
//! let cart = cart.with_incremented(product.id).unwrap();
//! assert_eq!(cart.find(product.id).unwrap().quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, LineItem};
pub use error::{SnapshotError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot is written under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Smallest quantity a line item may hold.
pub const MIN_ITEM_QUANTITY: i64 = 1;
