//! Configuration module for the storefront order service.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required values are properly set.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files for better organization:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)
//!
//! String values may reference environment variables as `${VAR}` or
//! `${VAR:-default}`.

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the storefront service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this service instance.
	pub service: ServiceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Order lifecycle settings.
	#[serde(default)]
	pub lifecycle: LifecycleConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Identity of this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Identifier used in log lines.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Order lifecycle settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LifecycleConfig {
	/// Interval in seconds between background reconciliation sweeps over all
	/// stored orders. Zero disables the sweeper; orders are then reconciled
	/// only when their owner requests it.
	#[serde(default)]
	pub reconcile_interval_seconds: u64,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
	/// Maximum request size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
	/// How callers are identified.
	#[serde(default)]
	pub auth: AuthConfig,
	/// CORS configuration. Permissive when absent.
	pub cors: Option<CorsConfig>,
}

/// Caller identification settings.
///
/// Credentials are verified by an upstream gateway, which forwards the
/// authenticated user id in `user_header`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
	#[serde(default = "default_user_header")]
	pub user_header: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			user_header: default_user_header(),
		}
	}
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
	/// Allowed origins for CORS.
	pub allowed_origins: Vec<String>,
	/// Allowed headers for CORS.
	#[serde(default = "default_cors_headers")]
	pub allowed_headers: Vec<String>,
	/// Allowed methods for CORS.
	#[serde(default = "default_cors_methods")]
	pub allowed_methods: Vec<String>,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	5001
}

fn default_api_timeout() -> u64 {
	30
}

/// Orders can carry base64 product images, hence the generous limit.
fn default_max_request_size() -> usize {
	50 * 1024 * 1024 // 50MB
}

fn default_user_header() -> String {
	"x-user-id".to_string()
}

fn default_cors_headers() -> Vec<String> {
	vec!["content-type".to_string(), "authorization".to_string()]
}

fn default_cors_methods() -> Vec<String> {
	["GET", "POST", "PUT", "DELETE", "OPTIONS"]
		.into_iter()
		.map(String::from)
		.collect()
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let result = re.replace_all(input, |cap: &regex::Captures<'_>| {
		let var_name = &cap[1];
		match (std::env::var(var_name), cap.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			},
		}
	});

	match missing {
		Some(var_name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		))),
		None => Ok(result.into_owned()),
	}
}

impl Config {
	/// Loads configuration from a file, resolving includes and environment
	/// variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;

		let mut loader = loader::ConfigLoader::new(base_dir);
		loader.load_config(file_name).await
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.trim().is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if self.lifecycle.reconcile_interval_seconds > 86400 {
			return Err(ConfigError::Validation(
				"Lifecycle reconcile_interval_seconds cannot exceed 86400 (24 hours)".into(),
			));
		}

		if let Some(api) = self.api.as_ref().filter(|api| api.enabled) {
			if api.port == 0 {
				return Err(ConfigError::Validation(
					"API port must be greater than 0".into(),
				));
			}
			if api.timeout_seconds == 0 {
				return Err(ConfigError::Validation(
					"API timeout_seconds must be greater than 0".into(),
				));
			}
			let header = &api.auth.user_header;
			if header.is_empty()
				|| !header
					.bytes()
					.all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
			{
				return Err(ConfigError::Validation(format!(
					"Invalid API auth user_header '{}'",
					header
				)));
			}
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string, resolving environment variables
/// and validating the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[service]
id = "storefront"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("STOREFRONT_TEST_HOST", "localhost");
		std::env::set_var("STOREFRONT_TEST_PORT", "5432");

		let input = "host = \"${STOREFRONT_TEST_HOST}:${STOREFRONT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("STOREFRONT_TEST_HOST");
		std::env::remove_var("STOREFRONT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${STOREFRONT_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${STOREFRONT_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("STOREFRONT_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_defaults() {
		let config: Config = MINIMAL.parse().unwrap();

		assert_eq!(config.service.id, "storefront");
		assert_eq!(config.lifecycle.reconcile_interval_seconds, 0);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_api_defaults() {
		let config_str = format!("{}\n[api]\nenabled = true\n", MINIMAL);
		let config: Config = config_str.parse().unwrap();
		let api = config.api.unwrap();

		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 5001);
		assert_eq!(api.auth.user_header, "x-user-id");
		assert_eq!(api.max_request_size, 50 * 1024 * 1024);
		assert!(api.cors.is_none());
	}

	#[test]
	fn test_unknown_primary_storage_rejected() {
		let config_str = r#"
[service]
id = "storefront"

[storage]
primary = "file"
[storage.implementations.memory]
"#;
		let result = config_str.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(msg)) if msg.contains("'file'")));
	}

	#[test]
	fn test_invalid_user_header_rejected() {
		let config_str = format!(
			"{}\n[api]\nenabled = true\n[api.auth]\nuser_header = \"x user\"\n",
			MINIMAL
		);
		assert!(matches!(
			config_str.parse::<Config>(),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_empty_service_id_rejected() {
		let config_str = MINIMAL.replace("id = \"storefront\"", "id = \"\"");
		assert!(matches!(
			config_str.parse::<Config>(),
			Err(ConfigError::Validation(_))
		));
	}
}
