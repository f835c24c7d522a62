//! Common types module for the storefront order service.
//!
//! This module defines the core data types and structures used throughout
//! the service. It provides a centralized location for shared types
//! to ensure consistency across the storage, core and HTTP layers.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order types including line items, statuses and the status timeline.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Product review types.
pub mod review;
/// Storage types for managing persistent data.
pub mod storage;
/// Utility functions for display formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;
/// Wishlist types.
pub mod wishlist;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use review::*;
pub use storage::*;
pub use utils::truncate_id;
pub use validation::*;
pub use wishlist::*;
