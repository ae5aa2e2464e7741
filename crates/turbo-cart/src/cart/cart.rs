//! Cart collection and its persisted snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use turbo_cache::{Cache, CacheError};

use crate::cart::LineItem;
use crate::error::CartError;

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Ordered collection of line items, in the order they were added.
///
/// Holds at most one line per product and never a line with amount 0. The
/// JSON form is a plain array of [`LineItem`]; decoding rejects arrays that
/// break either rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Get the line for a product.
    pub fn get(&self, product_id: u64) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: u64) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of amounts).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Append a line. Returns `false` (and leaves the cart alone) if the
    /// product is already present or the amount is 0.
    pub fn push(&mut self, item: LineItem) -> bool {
        if item.amount == 0 || self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Replace a line's amount in place. Returns `false` if the product is
    /// absent or `amount` is 0.
    pub fn set_amount(&mut self, product_id: u64, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove a product's line, keeping the order of the rest.
    pub fn remove(&mut self, product_id: u64) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartError::InvalidSnapshot(format!(
                    "product {} has amount 0",
                    item.product_id
                )));
            }
            if !seen.insert(item.product_id) {
                return Err(CartError::InvalidSnapshot(format!(
                    "product {} appears twice",
                    item.product_id
                )));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Load the cart snapshot stored under `key`.
///
/// Never fails: a missing, unparseable or invalid snapshot yields an empty
/// cart.
pub fn load_cart(cache: &Cache, key: &str) -> Cart {
    match cache.get::<Cart>(key) {
        Ok(Some(cart)) => {
            tracing::debug!(key, items = cart.len(), "loaded cart snapshot");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}

/// Overwrite the snapshot stored under `key` with `cart`.
pub fn save_cart(cache: &Cache, key: &str, cart: &Cart) -> Result<(), CacheError> {
    cache.set(key, cart)
}
