//! Shopping-cart state for TurboCommerce storefronts.
//!
//! The cart lives on the shopper's side: it is restored from a key-value
//! snapshot when the store opens and rewritten after every change. Adding
//! products and changing amounts are validated against the storefront's
//! stock service; product display data comes from the catalog.
//!
//! - **Cart**: [`Cart`] and [`LineItem`], the persisted snapshot
//! - **Store**: [`CartStore`], serialized add / remove / update operations
//! - **Services**: stock and catalog lookups ([`HttpStorefront`] over HTTP)
//! - **Notifications**: user-facing messages for failed operations
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turbo_cart::prelude::*;
//! use turbo_cache::Cache;
//! use turbo_data::FetchClient;
//!
//! let api = Arc::new(HttpStorefront::new(
//!     FetchClient::new().with_base_url("http://localhost:3333"),
//! ));
//! let store = CartStore::open(
//!     Cache::open_dir(".cart")?,
//!     api.clone(),
//!     api,
//!     Arc::new(|notice: Notice| eprintln!("{}", notice)),
//!     StoreOptions::default(),
//! );
//!
//! store.add_item(1).await.ok();
//! println!("Total: {:.2}", store.cart().total());
//! ```

pub mod cart;
pub mod error;
pub mod notify;
pub mod services;

pub use cart::{load_cart, save_cart, Cart, CartStore, LineItem, StoreOptions, CART_STORAGE_KEY};
pub use error::{CartError, Failure};
pub use notify::{Notice, NotificationSink, RecordingSink};
pub use services::{CatalogService, HttpStorefront, Product, StockRecord, StockService};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartStore, LineItem, StoreOptions};
    pub use crate::error::CartError;
    pub use crate::notify::{Notice, NotificationSink, RecordingSink};
    pub use crate::services::{CatalogService, HttpStorefront, Product, StockService};
}
