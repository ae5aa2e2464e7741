//! Remote lookups the cart depends on.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use turbo_data::FetchError;

pub use http::HttpStorefront;

/// Available stock for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product id.
    #[serde(default)]
    pub id: u64,
    /// Units available. Zero or negative means none.
    pub amount: i64,
}

/// Product display data returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id. Missing, null or 0 means the catalog has no such product.
    #[serde(default)]
    pub id: Option<u64>,
    /// Display name.
    #[serde(alias = "title", default)]
    pub name: String,
    /// Unit price.
    #[serde(default)]
    pub price: f64,
    /// Product image.
    #[serde(alias = "image", default)]
    pub image_url: String,
}

impl Product {
    /// The product id, if it is a usable one.
    pub fn valid_id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}

/// Looks up current stock for a product.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Current stock for `product_id`.
    async fn stock(&self, product_id: u64) -> Result<StockRecord, FetchError>;
}

/// Looks up product display data.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Product data for `product_id`, or `None` if the catalog doesn't know it.
    async fn product(&self, product_id: u64) -> Result<Option<Product>, FetchError>;
}
