//! Configuration builder for creating test and development configurations.

use crate::{ApiConfig, AuthConfig, Config, LifecycleConfig, ServiceConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to in-memory storage, no background sweeper and no API section.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_id: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	reconcile_interval_seconds: u64,
	api: Option<ApiConfig>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);
		Self {
			service_id: "storefront-test".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			reconcile_interval_seconds: 0,
			api: None,
		}
	}

	pub fn service_id(mut self, id: impl Into<String>) -> Self {
		self.service_id = id.into();
		self
	}

	/// Sets the primary storage implementation and its configuration.
	pub fn storage(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		let primary = primary.into();
		self.storage_implementations.insert(primary.clone(), config);
		self.storage_primary = primary;
		self
	}

	pub fn reconcile_interval_seconds(mut self, interval: u64) -> Self {
		self.reconcile_interval_seconds = interval;
		self
	}

	/// Enables the API on `port` with default settings.
	pub fn api_port(mut self, port: u16) -> Self {
		self.api = Some(ApiConfig {
			enabled: true,
			host: "127.0.0.1".to_string(),
			port,
			timeout_seconds: 30,
			max_request_size: 50 * 1024 * 1024,
			auth: AuthConfig::default(),
			cors: None,
		});
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				id: self.service_id,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			lifecycle: LifecycleConfig {
				reconcile_interval_seconds: self.reconcile_interval_seconds,
			},
			api: self.api,
		}
	}
}
