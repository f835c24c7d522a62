//! Main entry point for the storefront order service.
//!
//! Loads the configuration, builds the storefront engine over the configured
//! storage backend and serves the HTTP API next to the background
//! reconciliation sweeper.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_config::Config;
use storefront_core::{StorefrontBuilder, StorefrontEngine, StorefrontFactories};

mod apis;
mod server;

/// Command-line arguments for the storefront service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "STOREFRONT_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the storefront service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the engine over the configured storage
/// 5. Serves the API and sweeps orders until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started storefront");

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let engine = Arc::new(build_engine(config.clone())?);

	match config.api.clone().filter(|api| api.enabled) {
		Some(api_config) => {
			let engine_task = engine.run();
			let api_task = server::start_server(api_config, Arc::clone(&engine));

			tokio::select! {
				result = engine_task => {
					tracing::info!("Engine finished");
					result?;
				}
				result = api_task => {
					tracing::info!("API server finished");
					result?;
				}
			}
		},
		None => {
			tracing::info!("API disabled, running background reconciliation only");
			engine.run().await?;
		},
	}

	tracing::info!("Stopped storefront");
	Ok(())
}

/// Builds the storefront engine with every registered storage backend.
fn build_engine(config: Config) -> Result<StorefrontEngine, Box<dyn std::error::Error>> {
	let storage_factories = storefront_storage::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect();

	Ok(StorefrontBuilder::new(config).build(StorefrontFactories { storage_factories })?)
}
