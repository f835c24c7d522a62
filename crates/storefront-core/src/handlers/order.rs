//! Order handler for placing, listing and refreshing a customer's orders.

use crate::clock::Clock;
use crate::state::{OrderLifecycleManager, OrderStore, OrderStoreError};
use std::sync::Arc;
use storefront_types::{
	truncate_id, Order, OrderValidationError, ReconcileOrdersResponse, StoreOrderRequest,
};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while handling order requests.
#[derive(Debug, Error)]
pub enum OrderError {
	#[error("Invalid order: {0}")]
	Validation(#[from] OrderValidationError),
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Lifecycle error: {0}")]
	Lifecycle(String),
}

impl From<OrderStoreError> for OrderError {
	fn from(err: OrderStoreError) -> Self {
		match err {
			OrderStoreError::Validation(e) => OrderError::Validation(e),
			other => OrderError::Storage(other.to_string()),
		}
	}
}

/// Handler behind the order endpoints.
pub struct OrderHandler {
	store: Arc<OrderStore>,
	lifecycle: Arc<OrderLifecycleManager>,
	clock: Arc<dyn Clock>,
}

impl OrderHandler {
	pub fn new(
		store: Arc<OrderStore>,
		lifecycle: Arc<OrderLifecycleManager>,
		clock: Arc<dyn Clock>,
	) -> Self {
		Self {
			store,
			lifecycle,
			clock,
		}
	}

	/// Validates and stores a new `Pending` order for `owner_id`.
	#[instrument(skip_all, fields(owner_id = %truncate_id(owner_id)))]
	pub async fn place_order(
		&self,
		owner_id: &str,
		request: StoreOrderRequest,
	) -> Result<Order, OrderError> {
		let order = Order::place(
			uuid::Uuid::new_v4().to_string(),
			owner_id,
			request.items,
			request.total_amount,
			self.clock.now(),
		)?;

		self.store.insert(&order).await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			items = order.items.len(),
			total = %order.total_amount,
			"Order placed"
		);
		Ok(order)
	}

	/// Every order of `owner_id` as stored, newest first.
	pub async fn list_orders(&self, owner_id: &str) -> Result<Vec<Order>, OrderError> {
		Ok(self.store.orders_for_owner(owner_id).await?)
	}

	/// Reconciles the orders of `owner_id` and returns all of them, newest
	/// first, together with any writes that failed.
	pub async fn refresh_orders(
		&self,
		owner_id: &str,
	) -> Result<ReconcileOrdersResponse, OrderError> {
		let report = self
			.lifecycle
			.reconcile_owner(owner_id)
			.await
			.map_err(|e| OrderError::Lifecycle(e.to_string()))?;

		let orders = self.store.orders_for_owner(owner_id).await?;

		Ok(ReconcileOrdersResponse {
			orders,
			failures: report.failures,
		})
	}
}
