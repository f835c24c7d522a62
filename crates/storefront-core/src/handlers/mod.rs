//! Request handlers behind the storefront API.
//!
//! Each handler owns one area of the storefront and is shared by the HTTP
//! layer through the engine.

pub mod order;
pub mod review;
pub mod wishlist;

pub use order::{OrderError, OrderHandler};
pub use review::{ReviewError, ReviewHandler};
pub use wishlist::{WishlistError, WishlistHandler};
