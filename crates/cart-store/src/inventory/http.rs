//! # HTTP Inventory
//!
//! REST client for the inventory service.
//!
//! ## Endpoints
//! ```text
//! GET {base}/products/{id}  →  { "id": 1, "title": "...", "price": 179.9, "image": "..." }
//! GET {base}/stock/{id}     →  { "id": 1, "amount": 3 }
//! ```
//!
//! Prices arrive as decimal currency units and are converted to cents on
//! the way in. A 404 maps to [`InventoryError::NotFound`]; any other
//! non-success status to [`InventoryError::Status`].

use std::time::Duration;

use async_trait::async_trait;
use cart_core::{Product, ProductId, StockRecord};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::Inventory;
use crate::error::{InventoryError, InventoryResult};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductPayload {
    id: u64,
    title: String,
    price: f64,
    image: String,
}

#[derive(Debug, Deserialize)]
struct StockPayload {
    id: u64,
    amount: i64,
}

fn price_to_cents(price: f64) -> InventoryResult<i64> {
    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::Decode(format!("invalid price {price}")));
    }
    Ok((price * 100.0).round() as i64)
}

fn check_id(resource: &str, expected: ProductId, actual: u64) -> InventoryResult<()> {
    if expected.get() != actual {
        return Err(InventoryError::Decode(format!(
            "requested {resource} {expected}, got {actual}"
        )));
    }
    Ok(())
}

// =============================================================================
// Client
// =============================================================================

/// Inventory backed by the REST service.
#[derive(Debug, Clone)]
pub struct HttpInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventory {
    /// Creates a client with no request timeout.
    pub fn new(base_url: impl Into<String>) -> InventoryResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client, optionally bounding every request.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> InventoryResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| InventoryError::Transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, ?timeout, "Inventory client created");

        Ok(HttpInventory { client, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        collection: &str,
        id: ProductId,
    ) -> InventoryResult<T> {
        let url = format!("{}/{}/{}", self.base_url, collection, id);
        debug!(url = %url, "Inventory request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound {
                resource,
                product_id: id,
            });
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Inventory request rejected");
            return Err(InventoryError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| InventoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Inventory for HttpInventory {
    async fn product(&self, id: ProductId) -> InventoryResult<Product> {
        let payload: ProductPayload = self.fetch("product", "products", id).await?;
        check_id("product", id, payload.id)?;

        Ok(Product {
            id,
            title: payload.title,
            price_cents: price_to_cents(payload.price)?,
            image: payload.image,
        })
    }

    async fn stock(&self, id: ProductId) -> InventoryResult<StockRecord> {
        let payload: StockPayload = self.fetch("stock", "stock", id).await?;
        check_id("stock", id, payload.id)?;

        Ok(StockRecord::new(id, payload.amount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
