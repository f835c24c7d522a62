//! Order state for the storefront.
//!
//! `lifecycle` holds the pure status derivation policy, `store` the typed
//! order persistence and `order` the manager that combines the two.

pub mod lifecycle;
pub mod order;
pub mod store;

pub use lifecycle::{advance, derive_status, describe, reconcile, reconcile_all, Transition};
pub use order::{LifecycleError, OrderLifecycleManager, ReconcileReport};
pub use store::{OrderStore, OrderStoreError};
