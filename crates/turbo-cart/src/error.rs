//! Cart error types.

use thiserror::Error;
use turbo_cache::CacheError;
use turbo_data::FetchError;

/// Errors that can occur in cart operations.
///
/// Every error is also reported to the store's notification sink (except
/// [`CartError::ProductNotFound`] unless configured); callers may ignore the
/// returned value.
#[derive(Error, Debug)]
pub enum CartError {
    /// Stock service reports nothing available.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: u64 },

    /// Requested amount exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: u64,
        requested: i64,
        available: i64,
    },

    /// Product is not in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotFound(u64),

    /// Catalog has no valid product for this id.
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Amount does not fit a line item.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Adding a product failed unexpectedly.
    #[error("Failed to add product: {0}")]
    AddFailed(#[source] Failure),

    /// Removing a product failed unexpectedly.
    #[error("Failed to remove product: {0}")]
    RemoveFailed(#[source] Failure),

    /// Updating a product amount failed unexpectedly.
    #[error("Failed to update product amount: {0}")]
    UpdateFailed(#[source] Failure),

    /// A persisted snapshot breaks the cart invariants.
    #[error("Invalid cart snapshot: {0}")]
    InvalidSnapshot(String),
}

impl CartError {
    /// Whether this is an expected business rejection rather than an
    /// infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            CartError::AddFailed(_)
                | CartError::RemoveFailed(_)
                | CartError::UpdateFailed(_)
                | CartError::InvalidSnapshot(_)
        )
    }
}

/// Underlying cause of an unexpected operation failure.
#[derive(Error, Debug)]
pub enum Failure {
    /// Remote lookup failed (network, status, malformed body).
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Persisting the cart failed.
    #[error(transparent)]
    Storage(#[from] CacheError),
}
