//! Wishlist handler.
//!
//! Each customer has one wishlist, stored under their user id. A customer
//! without a stored wishlist has an empty one.

use crate::clock::Clock;
use crate::locks::KeyedLocks;
use std::sync::Arc;
use storefront_storage::{StorageError, StorageService};
use storefront_types::{truncate_id, StorageKey, Wishlist, WishlistAction};
use thiserror::Error;

/// Errors that can occur while handling wishlist requests.
#[derive(Debug, Error)]
pub enum WishlistError {
	#[error("Product ID is required")]
	MissingProductId,
	#[error("Invalid action: {0}")]
	InvalidAction(String),
	#[error("Storage error: {0}")]
	Storage(String),
}

pub struct WishlistHandler {
	storage: Arc<StorageService>,
	clock: Arc<dyn Clock>,
	locks: KeyedLocks,
}

impl WishlistHandler {
	pub fn new(storage: Arc<StorageService>, clock: Arc<dyn Clock>) -> Self {
		Self {
			storage,
			clock,
			locks: KeyedLocks::new(),
		}
	}

	/// Saved product ids of `owner_id`, in the order they were added.
	pub async fn wishlist(&self, owner_id: &str) -> Result<Vec<String>, WishlistError> {
		Ok(self
			.load(owner_id)
			.await?
			.map(|wishlist| wishlist.product_ids)
			.unwrap_or_default())
	}

	/// Every stored wishlist, ordered by owner id.
	pub async fn all_wishlists(&self) -> Result<Vec<Wishlist>, WishlistError> {
		let mut wishlists: Vec<Wishlist> = self
			.storage
			.retrieve_all(StorageKey::Wishlists.as_str())
			.await
			.map_err(|e| WishlistError::Storage(e.to_string()))?
			.into_iter()
			.map(|(_, wishlist)| wishlist)
			.collect();
		wishlists.sort_by(|a, b| a.owner_id.cmp(&b.owner_id));
		Ok(wishlists)
	}

	/// Adds or removes `product_id` and returns the resulting list.
	///
	/// `action` must be `add` or `remove`. Repeated adds and removals of
	/// absent products leave the list unchanged. Updates for the same owner
	/// are applied one at a time.
	pub async fn update(
		&self,
		owner_id: &str,
		product_id: Option<&str>,
		action: &str,
	) -> Result<Vec<String>, WishlistError> {
		let product_id = product_id
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.ok_or(WishlistError::MissingProductId)?;
		let action: WishlistAction = action
			.parse()
			.map_err(|_| WishlistError::InvalidAction(action.to_string()))?;

		let _guard = self.locks.lock(owner_id).await;
		let now = self.clock.now();
		let mut wishlist = self
			.load(owner_id)
			.await?
			.unwrap_or_else(|| Wishlist::empty(owner_id, now));

		if wishlist.apply(product_id, action, now) {
			self.storage
				.store(StorageKey::Wishlists.as_str(), owner_id, &wishlist)
				.await
				.map_err(|e| WishlistError::Storage(e.to_string()))?;
			tracing::debug!(
				owner_id = %truncate_id(owner_id),
				product_id,
				%action,
				"Wishlist updated"
			);
		}

		Ok(wishlist.product_ids)
	}

	async fn load(&self, owner_id: &str) -> Result<Option<Wishlist>, WishlistError> {
		match self
			.storage
			.retrieve(StorageKey::Wishlists.as_str(), owner_id)
			.await
		{
			Ok(wishlist) => Ok(Some(wishlist)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(WishlistError::Storage(e.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::SystemClock;
	use storefront_storage::implementations::memory::MemoryStorage;

	fn handler() -> WishlistHandler {
		WishlistHandler::new(
			Arc::new(StorageService::new(Box::new(MemoryStorage::new()))),
			Arc::new(SystemClock),
		)
	}

	#[tokio::test]
	async fn test_missing_wishlist_is_empty() {
		assert!(handler().wishlist("u1").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_add_is_idempotent_and_remove_tolerates_absent() {
		let handler = handler();

		handler.update("u1", Some("p1"), "add").await.unwrap();
		handler.update("u1", Some("p2"), "add").await.unwrap();
		let list = handler.update("u1", Some("p1"), "add").await.unwrap();
		assert_eq!(list, vec!["p1", "p2"]);

		let list = handler.update("u1", Some("p3"), "remove").await.unwrap();
		assert_eq!(list, vec!["p1", "p2"]);

		let list = handler.update("u1", Some("p1"), "remove").await.unwrap();
		assert_eq!(list, vec!["p2"]);
		assert_eq!(handler.wishlist("u1").await.unwrap(), vec!["p2"]);
		assert!(handler.wishlist("u2").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_all_wishlists_lists_every_owner() {
		let handler = handler();
		assert!(handler.all_wishlists().await.unwrap().is_empty());

		handler.update("u2", Some("p1"), "add").await.unwrap();
		handler.update("u1", Some("p2"), "add").await.unwrap();
		handler.update("u1", Some("p3"), "add").await.unwrap();

		let wishlists = handler.all_wishlists().await.unwrap();
		assert_eq!(wishlists.len(), 2);
		assert_eq!(wishlists[0].owner_id, "u1");
		assert_eq!(wishlists[0].product_ids, vec!["p2", "p3"]);
		assert_eq!(wishlists[1].owner_id, "u2");
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_adds_are_all_kept() {
		let handler = Arc::new(handler());

		let tasks: Vec<_> = (0..64)
			.map(|i| {
				let handler = handler.clone();
				tokio::spawn(async move {
					handler
						.update("u1", Some(&format!("p{}", i)), "add")
						.await
						.unwrap();
				})
			})
			.collect();
		for task in tasks {
			task.await.unwrap();
		}

		let mut stored = handler.wishlist("u1").await.unwrap();
		stored.sort();
		let mut expected: Vec<String> = (0..64).map(|i| format!("p{}", i)).collect();
		expected.sort();
		assert_eq!(stored, expected);
	}

	#[tokio::test]
	async fn test_update_validates_input() {
		let handler = handler();

		assert!(matches!(
			handler.update("u1", None, "add").await,
			Err(WishlistError::MissingProductId)
		));
		assert!(matches!(
			handler.update("u1", Some("  "), "add").await,
			Err(WishlistError::MissingProductId)
		));
		assert!(matches!(
			handler.update("u1", Some("p1"), "toggle").await,
			Err(WishlistError::InvalidAction(action)) if action == "toggle"
		));
	}
}
