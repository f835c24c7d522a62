//! Builder pattern for constructing storefront engines.
//!
//! Storage backends are pluggable: the builder picks the configured
//! implementations out of a map of factory functions and wires the primary
//! one into the engine.

use crate::clock::{Clock, SystemClock};
use crate::engine::StorefrontEngine;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_config::Config;
use storefront_storage::{StorageError, StorageInterface, StorageService};
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions needed to build a StorefrontEngine, keyed by
/// implementation name.
pub struct StorefrontFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing a StorefrontEngine with pluggable storage.
pub struct StorefrontBuilder {
	config: Config,
	clock: Arc<dyn Clock>,
}

impl StorefrontBuilder {
	/// Creates a new StorefrontBuilder reading time from the system clock.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			clock: Arc::new(SystemClock),
		}
	}

	/// Replaces the clock handed to the engine.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Builds the StorefrontEngine using the given storage factories.
	pub fn build<SF>(
		self,
		factories: StorefrontFactories<SF>,
	) -> Result<StorefrontEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = factories.storage_factories.get(name) else {
				tracing::warn!(
					component = "storage",
					implementation = %name,
					"No factory registered, skipping"
				);
				continue;
			};

			match factory(config) {
				Ok(implementation) => {
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
					storage_impls.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		if storage_impls.is_empty() {
			return Err(BuilderError::MissingComponent(
				"No valid storage implementations available".into(),
			));
		}

		let primary_storage = &self.config.storage.primary;
		let storage_backend = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' failed to load or has invalid configuration",
				primary_storage
			))
		})?;

		let storage = Arc::new(StorageService::new(storage_backend));
		Ok(StorefrontEngine::new(self.config, storage, self.clock))
	}
}
