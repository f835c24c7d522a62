//! Storage module for the storefront order service.
//!
//! This module provides abstractions for persistent storage of orders and
//! wishlists, supporting different backend implementations such as in-memory
//! or file-based storage. Values are stored as JSON under
//! `namespace:id` keys and can be queried by top-level field.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use storefront_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// Backends deal only in raw bytes; typing and JSON encoding are handled by
/// [`StorageService`].
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes under the given key, replacing any previous value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Lists the ids stored under `namespace`, sorted ascending.
	///
	/// Ids are returned without the `namespace:` prefix.
	async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Filter applied to the JSON form of stored values.
///
/// Field names refer to top-level keys of the serialized value, e.g.
/// `"ownerId"` or `"status"` for an order.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
	/// Matches every value.
	All,
	/// Field is present and equal to the value.
	Equals(String, serde_json::Value),
	/// Field is absent or different from the value.
	NotEquals(String, serde_json::Value),
	/// Field is present and equal to one of the values.
	In(String, Vec<serde_json::Value>),
	/// Field is absent or equal to none of the values.
	NotIn(String, Vec<serde_json::Value>),
	/// Every inner filter matches.
	And(Vec<QueryFilter>),
}

impl QueryFilter {
	/// Returns true if `value` satisfies this filter.
	pub fn matches(&self, value: &serde_json::Value) -> bool {
		match self {
			QueryFilter::All => true,
			QueryFilter::Equals(field, expected) => value.get(field) == Some(expected),
			QueryFilter::NotEquals(field, expected) => value.get(field) != Some(expected),
			QueryFilter::In(field, candidates) => value
				.get(field)
				.is_some_and(|actual| candidates.contains(actual)),
			QueryFilter::NotIn(field, candidates) => !value
				.get(field)
				.is_some_and(|actual| candidates.contains(actual)),
			QueryFilter::And(filters) => filters.iter().all(|filter| filter.matches(value)),
		}
	}
}

/// High-level storage service that provides typed operations.
///
/// The StorageService wraps a low-level storage backend and provides
/// convenient methods for storing and retrieving typed data with
/// automatic serialization/deserialization.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

fn make_key(namespace: &str, id: &str) -> String {
	format!("{}:{}", namespace, id)
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Stores a serializable value, creating or overwriting it.
	///
	/// The namespace and id are combined to form a unique key.
	/// The data is serialized to JSON before storage.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&make_key(namespace, id), bytes).await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&make_key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Removes a value from storage.
	pub async fn remove(&self, namespace: &str, id: &str) -> Result<(), StorageError> {
		self.backend.delete(&make_key(namespace, id)).await
	}

	/// Updates an existing value in storage.
	///
	/// Returns `NotFound` if the key doesn't exist, making it semantically
	/// different from store() which will create or overwrite.
	pub async fn update<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let key = make_key(namespace, id);

		if !self.backend.exists(&key).await? {
			return Err(StorageError::NotFound);
		}

		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.set_bytes(&key, bytes).await
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&make_key(namespace, id)).await
	}

	/// Retrieves every value stored under `namespace` as `(id, value)` pairs.
	pub async fn retrieve_all<T: DeserializeOwned>(
		&self,
		namespace: &str,
	) -> Result<Vec<(String, T)>, StorageError> {
		self.query(namespace, QueryFilter::All).await
	}

	/// Retrieves the values under `namespace` whose JSON form matches `filter`.
	///
	/// Entries deleted between listing and reading are skipped.
	pub async fn query<T: DeserializeOwned>(
		&self,
		namespace: &str,
		filter: QueryFilter,
	) -> Result<Vec<(String, T)>, StorageError> {
		let ids = self.backend.list_ids(namespace).await?;
		let mut results = Vec::new();

		for id in ids {
			let bytes = match self.backend.get_bytes(&make_key(namespace, &id)).await {
				Ok(bytes) => bytes,
				Err(StorageError::NotFound) => continue,
				Err(e) => return Err(e),
			};

			let value: serde_json::Value = serde_json::from_slice(&bytes)
				.map_err(|e| StorageError::Serialization(e.to_string()))?;
			if !filter.matches(&value) {
				continue;
			}

			let typed =
				serde_json::from_value(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
			results.push((id, typed));
		}

		Ok(results)
	}
}
