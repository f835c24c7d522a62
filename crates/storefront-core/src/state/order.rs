//! Persisting order lifecycle manager.
//!
//! Loads the orders that can still move, reconciles them against the clock
//! and writes back only the ones whose status changed. A failed write is
//! recorded against its order and the batch carries on.

use super::lifecycle;
use super::store::OrderStore;
use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use storefront_types::{truncate_id, Order, OrderStatus, ReconcileFailure};
use thiserror::Error;
use tracing::instrument;

/// Errors that abort a reconciliation batch.
#[derive(Debug, Error)]
pub enum LifecycleError {
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Outcome of one reconciliation batch.
#[derive(Debug, Default)]
pub struct ReconcileReport {
	/// Every order that was examined, newest first. Orders whose write failed
	/// keep their previously stored state.
	pub orders: Vec<Order>,
	/// Number of orders whose new status was persisted.
	pub changed: usize,
	/// Orders whose new status could not be persisted.
	pub failures: Vec<ReconcileFailure>,
}

/// Drives stored orders through their lifecycle.
pub struct OrderLifecycleManager {
	store: Arc<OrderStore>,
	clock: Arc<dyn Clock>,
}

impl OrderLifecycleManager {
	pub fn new(store: Arc<OrderStore>, clock: Arc<dyn Clock>) -> Self {
		Self { store, clock }
	}

	/// Reconciles the non-delivered orders of `owner_id` at the current time.
	pub async fn reconcile_owner(&self, owner_id: &str) -> Result<ReconcileReport, LifecycleError> {
		self.reconcile_owner_at(owner_id, self.clock.now()).await
	}

	/// Reconciles the non-delivered orders of `owner_id` at `now`.
	#[instrument(skip_all, fields(owner_id = %truncate_id(owner_id)))]
	pub async fn reconcile_owner_at(
		&self,
		owner_id: &str,
		now: DateTime<Utc>,
	) -> Result<ReconcileReport, LifecycleError> {
		let orders = self
			.store
			.find_orders_not_in_status(owner_id, &[OrderStatus::Delivered])
			.await
			.map_err(|e| LifecycleError::Storage(e.to_string()))?;

		Ok(self.apply(orders, now).await)
	}

	/// Reconciles every non-delivered order in storage at the current time.
	#[instrument(skip_all)]
	pub async fn reconcile_everyone(&self) -> Result<ReconcileReport, LifecycleError> {
		let orders = self
			.store
			.find_all_not_in_status(&[OrderStatus::Delivered])
			.await
			.map_err(|e| LifecycleError::Storage(e.to_string()))?;

		Ok(self.apply(orders, self.clock.now()).await)
	}

	async fn apply(&self, orders: Vec<Order>, now: DateTime<Utc>) -> ReconcileReport {
		let mut report = ReconcileReport::default();

		for snapshot in orders {
			if lifecycle::derive_status(snapshot.placed_at, now) <= snapshot.status {
				report.orders.push(snapshot);
				continue;
			}

			// Another writer may have advanced the order since the snapshot
			// was read, so the change is computed from the stored copy.
			let _guard = self.store.lock(&snapshot.id).await;
			let stored = match self.store.get(&snapshot.id).await {
				Ok(stored) => stored,
				Err(e) => {
					tracing::warn!(
						order_id = %truncate_id(&snapshot.id),
						error = %e,
						"Failed to reload order"
					);
					report.failures.push(ReconcileFailure {
						order_id: snapshot.id.clone(),
						error: e.to_string(),
					});
					report.orders.push(snapshot);
					continue;
				},
			};

			let mut order = stored.clone();
			let Some(transition) = lifecycle::advance(&mut order, now) else {
				report.orders.push(stored);
				continue;
			};

			match self.store.save(&order).await {
				Ok(()) => {
					tracing::info!(
						order_id = %truncate_id(&order.id),
						from = %transition.from,
						to = %transition.to,
						"Order status advanced"
					);
					report.changed += 1;
					report.orders.push(order);
				},
				Err(e) => {
					tracing::warn!(
						order_id = %truncate_id(&order.id),
						error = %e,
						"Failed to persist order status"
					);
					report.failures.push(ReconcileFailure {
						order_id: order.id,
						error: e.to_string(),
					});
					report.orders.push(stored);
				},
			}
		}

		if report.changed > 0 || !report.failures.is_empty() {
			tracing::debug!(
				examined = report.orders.len(),
				changed = report.changed,
				failed = report.failures.len(),
				"Reconciliation finished"
			);
		}

		report
	}
}
