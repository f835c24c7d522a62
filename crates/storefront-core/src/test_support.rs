//! Shared fixtures for core tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use storefront_storage::implementations::memory::MemoryStorage;
use storefront_storage::{StorageError, StorageInterface};
use storefront_types::{ConfigSchema, Order, OrderItem};

/// Memory backend whose writes fail for selected keys.
#[derive(Clone, Default)]
pub struct FailingWrites {
	inner: Arc<MemoryStorage>,
	failing: Arc<Mutex<HashSet<String>>>,
}

impl FailingWrites {
	pub fn fail_writes_for(&self, key: &str) {
		self.failing.lock().unwrap().insert(key.to_string());
	}
}

#[async_trait]
impl StorageInterface for FailingWrites {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		self.inner.get_bytes(key).await
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		if self.failing.lock().unwrap().contains(key) {
			return Err(StorageError::Backend(format!("write refused for {}", key)));
		}
		self.inner.set_bytes(key, value).await
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.inner.delete(key).await
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		self.inner.exists(key).await
	}

	async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
		self.inner.list_ids(namespace).await
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		self.inner.config_schema()
	}
}

/// A one-item Pending order.
pub fn sample_order(id: &str, owner_id: &str, placed_at: DateTime<Utc>) -> Order {
	Order::place(
		id,
		owner_id,
		vec![OrderItem {
			product_id: "p-1".to_string(),
			name: "Cotton throw".to_string(),
			price: Decimal::new(3450, 2),
			quantity: 1,
			image: None,
		}],
		Decimal::new(3450, 2),
		placed_at,
	)
	.unwrap()
}
