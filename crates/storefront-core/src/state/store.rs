//! Typed access to persisted orders.

use crate::locks::{KeyGuard, KeyedLocks};
use serde_json::Value;
use std::sync::Arc;
use storefront_storage::{QueryFilter, StorageError, StorageService};
use storefront_types::{Order, OrderStatus, OrderValidationError, StorageKey};
use thiserror::Error;

/// Errors that can occur while reading or writing orders.
#[derive(Debug, Error)]
pub enum OrderStoreError {
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Invalid order: {0}")]
	Validation(#[from] OrderValidationError),
	#[error("Order not found: {0}")]
	OrderNotFound(String),
}

/// Order persistence over the shared storage service.
///
/// Orders live in the `orders` namespace keyed by order id. Writers that
/// read an order before overwriting it hold [`OrderStore::lock`] for that id.
pub struct OrderStore {
	storage: Arc<StorageService>,
	locks: KeyedLocks,
}

fn status_values(statuses: &[OrderStatus]) -> Vec<Value> {
	statuses
		.iter()
		.map(|status| Value::String(status.as_str().to_string()))
		.collect()
}

fn owner_filter(owner_id: &str) -> QueryFilter {
	QueryFilter::Equals("ownerId".to_string(), Value::String(owner_id.to_string()))
}

/// Newest first; ties broken by id so the order is stable.
fn sort_newest_first(orders: &mut [Order]) {
	orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at).then_with(|| a.id.cmp(&b.id)));
}

impl OrderStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			locks: KeyedLocks::new(),
		}
	}

	/// Serializes read-modify-write cycles on one order.
	pub async fn lock(&self, order_id: &str) -> KeyGuard<'_> {
		self.locks.lock(order_id).await
	}

	/// Orders of `owner_id` whose status is not in `excluded`, newest first.
	pub async fn find_orders_not_in_status(
		&self,
		owner_id: &str,
		excluded: &[OrderStatus],
	) -> Result<Vec<Order>, OrderStoreError> {
		self.query(QueryFilter::And(vec![
			owner_filter(owner_id),
			QueryFilter::NotIn("status".to_string(), status_values(excluded)),
		]))
		.await
	}

	/// Orders of every owner whose status is not in `excluded`, newest first.
	pub async fn find_all_not_in_status(
		&self,
		excluded: &[OrderStatus],
	) -> Result<Vec<Order>, OrderStoreError> {
		self.query(QueryFilter::NotIn(
			"status".to_string(),
			status_values(excluded),
		))
		.await
	}

	/// Every order of `owner_id`, newest first.
	pub async fn orders_for_owner(&self, owner_id: &str) -> Result<Vec<Order>, OrderStoreError> {
		self.query(owner_filter(owner_id)).await
	}

	pub async fn get(&self, order_id: &str) -> Result<Order, OrderStoreError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => OrderStoreError::OrderNotFound(order_id.to_string()),
				other => OrderStoreError::Storage(other.to_string()),
			})
	}

	/// Persists a newly placed order.
	pub async fn insert(&self, order: &Order) -> Result<(), OrderStoreError> {
		order.verify_timeline()?;
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| OrderStoreError::Storage(e.to_string()))
	}

	/// Overwrites an existing order. Fails if the order was never inserted.
	pub async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
		order.verify_timeline()?;
		self.storage
			.update(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(|e| match e {
				StorageError::NotFound => OrderStoreError::OrderNotFound(order.id.clone()),
				other => OrderStoreError::Storage(other.to_string()),
			})
	}

	async fn query(&self, filter: QueryFilter) -> Result<Vec<Order>, OrderStoreError> {
		let mut orders: Vec<Order> = self
			.storage
			.query(StorageKey::Orders.as_str(), filter)
			.await
			.map_err(|e| OrderStoreError::Storage(e.to_string()))?
			.into_iter()
			.map(|(_, order)| order)
			.collect();
		sort_newest_first(&mut orders);
		Ok(orders)
	}
}
