//! Storage namespaces used by the storefront.

/// Namespaces of the persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Orders, keyed by order id.
	Orders,
	/// Per-user wishlists, keyed by owner id.
	Wishlists,
	/// Product reviews, keyed by review id.
	Reviews,
}

impl StorageKey {
	/// Returns the namespace string used by the storage backends.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Wishlists => "wishlists",
			StorageKey::Reviews => "reviews",
		}
	}
}
