//! Type-safe Key-Value persistence layer for TurboCommerce.
//!
//! Provides a small, ergonomic API for keeping JSON-serialized values in a
//! key-value store. Backends implement [`KvStore`]:
//!
//! - [`MemoryStore`] for tests and embedding
//! - [`FileStore`] for native builds (one file per key)
//! - `SpinStore` over Spin's Key-Value Store on `wasm32`
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::Cache;
//!
//! let cache = Cache::open_dir(".cart")?;
//!
//! // Store a value
//! cache.set("@RocketShoes:cart", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = cache.get("@RocketShoes:cart")?;
//!
//! // Delete a value
//! cache.delete("@RocketShoes:cart")?;
//! ```

mod error;
mod file;
mod kv;
mod memory;
#[cfg(target_arch = "wasm32")]
mod spin;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
