//! Line item type.

use serde::{Deserialize, Serialize};

use crate::services::Product;

/// One product in the cart with its quantity.
///
/// Serialized with the storefront's JSON field names (`id`, `imageUrl`);
/// `productId`, `title` and `image` are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog product id. Unique within a cart.
    #[serde(rename = "id", alias = "productId")]
    pub product_id: u64,
    /// Display name.
    #[serde(alias = "title")]
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Product image.
    #[serde(alias = "image", default)]
    pub image_url: String,
    /// Quantity. Always at least 1.
    pub amount: u32,
}

impl LineItem {
    /// A new line for `product` with amount 1.
    pub fn new(product_id: u64, product: Product) -> Self {
        Self {
            product_id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount: 1,
        }
    }

    /// Unit price times amount.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}
