//! Storefront engine.
//!
//! Holds the shared services the HTTP layer works with and runs the optional
//! background sweeper that reconciles every stored order on a fixed interval.

use crate::clock::Clock;
use crate::handlers::{OrderHandler, ReviewHandler, WishlistHandler};
use crate::state::{OrderLifecycleManager, OrderStore, ReconcileReport};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use storefront_config::Config;
use storefront_storage::StorageService;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Service error: {0}")]
	Service(String),
}

/// Main storefront engine.
#[derive(Clone)]
pub struct StorefrontEngine {
	/// Service configuration.
	pub(crate) config: Config,
	/// Storage service for persisting orders and wishlists.
	pub(crate) storage: Arc<StorageService>,
	/// Lifecycle manager shared by the sweeper and the order handler.
	pub(crate) lifecycle: Arc<OrderLifecycleManager>,
	/// Order handler
	pub(crate) order_handler: Arc<OrderHandler>,
	/// Wishlist handler
	pub(crate) wishlist_handler: Arc<WishlistHandler>,
	/// Review handler
	pub(crate) review_handler: Arc<ReviewHandler>,
}

impl StorefrontEngine {
	/// Creates a new engine over `storage`, reading time from `clock`.
	pub fn new(config: Config, storage: Arc<StorageService>, clock: Arc<dyn Clock>) -> Self {
		let store = Arc::new(OrderStore::new(storage.clone()));
		let lifecycle = Arc::new(OrderLifecycleManager::new(store.clone(), clock.clone()));
		let order_handler = Arc::new(OrderHandler::new(
			store,
			lifecycle.clone(),
			clock.clone(),
		));
		let wishlist_handler = Arc::new(WishlistHandler::new(storage.clone(), clock.clone()));
		let review_handler = Arc::new(ReviewHandler::new(storage.clone(), clock));

		Self {
			config,
			storage,
			lifecycle,
			order_handler,
			wishlist_handler,
			review_handler,
		}
	}

	/// Runs the background sweeper until Ctrl+C.
	pub async fn run(&self) -> Result<(), EngineError> {
		self.run_until(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "Failed to listen for shutdown signal");
			}
		})
		.await
	}

	/// Runs the background sweeper until `shutdown` completes.
	///
	/// With `reconcile_interval_seconds = 0` nothing is swept and this only
	/// waits for `shutdown`.
	pub async fn run_until<F>(&self, shutdown: F) -> Result<(), EngineError>
	where
		F: Future<Output = ()>,
	{
		let interval_seconds = self.config.lifecycle.reconcile_interval_seconds;
		if interval_seconds == 0 {
			tracing::info!("Background reconciliation disabled");
			shutdown.await;
			return Ok(());
		}

		tracing::info!(interval_seconds, "Background reconciliation enabled");
		let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
		interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				_ = interval.tick() => {
					if let Err(e) = self.sweep().await {
						tracing::warn!(error = %e, "Background reconciliation failed");
					}
				}

				_ = &mut shutdown => {
					break;
				}
			}
		}

		Ok(())
	}

	/// Reconciles every non-delivered order once.
	pub async fn sweep(&self) -> Result<ReconcileReport, EngineError> {
		let report = self
			.lifecycle
			.reconcile_everyone()
			.await
			.map_err(|e| EngineError::Service(e.to_string()))?;

		if report.changed > 0 || !report.failures.is_empty() {
			tracing::info!(
				changed = report.changed,
				failed = report.failures.len(),
				"Background reconciliation pass"
			);
		}
		Ok(report)
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns a reference to the storage service.
	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}

	pub fn lifecycle(&self) -> &Arc<OrderLifecycleManager> {
		&self.lifecycle
	}

	pub fn order_handler(&self) -> &Arc<OrderHandler> {
		&self.order_handler
	}

	pub fn wishlist_handler(&self) -> &Arc<WishlistHandler> {
		&self.wishlist_handler
	}

	pub fn review_handler(&self) -> &Arc<ReviewHandler> {
		&self.review_handler
	}
}
