//! Core of the storefront order service.
//!
//! Owns the order lifecycle: the time based status derivation policy, the
//! manager that applies it to stored orders, and the request handlers the
//! HTTP layer calls. The engine bundles these services and runs the optional
//! background sweeper; the builder assembles an engine from configuration
//! and storage factories.

pub mod builder;
pub mod clock;
pub mod engine;
pub mod handlers;
pub mod locks;
pub mod state;

#[cfg(test)]
mod test_support;

pub use builder::{BuilderError, StorefrontBuilder, StorefrontFactories};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{EngineError, StorefrontEngine};
pub use handlers::{
	OrderError, OrderHandler, ReviewError, ReviewHandler, WishlistError, WishlistHandler,
};
pub use locks::{KeyGuard, KeyedLocks};
pub use state::{
	LifecycleError, OrderLifecycleManager, OrderStore, OrderStoreError, ReconcileReport,
};
