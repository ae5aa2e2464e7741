//! Shopping cart module.
//!
//! Contains the cart model, its persisted snapshot, and [`CartStore`], the
//! component UI handlers talk to.

mod cart;
mod item;
mod store;

pub use cart::{load_cart, save_cart, Cart, CART_STORAGE_KEY};
pub use item::LineItem;
pub use store::{CartStore, StoreOptions};
