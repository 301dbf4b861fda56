//! Service configuration, loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Invalid value for {0}: {1}")]
	Invalid(&'static str, String),
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
	/// MongoDB connection string
	pub uri: String,
	/// Database name
	pub name: String,
	pub max_pool_size: Option<u32>,
}

/// Service settings
///
/// Built once in `main` and handed down; nothing reads the environment
/// after startup.
#[derive(Debug, Clone)]
pub struct Settings {
	/// Enables verbose logging defaults
	pub debug: bool,
	/// Address the HTTP server binds to
	pub addr: SocketAddr,
	/// Public base URL used when building share links
	pub base_url: String,
	pub database: DatabaseSettings,
}

impl Settings {
	/// Load settings from the environment, falling back to defaults
	///
	/// Variables: `TOMADOS_DEBUG`, `TOMADOS_ADDR`, `TOMADOS_BASE_URL`,
	/// `MONGODB_URI`, `MONGODB_DATABASE`, `MONGODB_MAX_POOL_SIZE`.
	pub fn from_env() -> Result<Self, SettingsError> {
		let addr = env_or("TOMADOS_ADDR", "127.0.0.1:8000");
		let addr: SocketAddr = addr
			.parse()
			.map_err(|_| SettingsError::Invalid("TOMADOS_ADDR", addr))?;

		let max_pool_size = match env::var("MONGODB_MAX_POOL_SIZE") {
			Ok(value) => Some(
				value
					.parse()
					.map_err(|_| SettingsError::Invalid("MONGODB_MAX_POOL_SIZE", value))?,
			),
			Err(_) => None,
		};

		Ok(Self {
			debug: parse_bool(&env_or("TOMADOS_DEBUG", "false")),
			addr,
			base_url: env_or("TOMADOS_BASE_URL", "http://localhost:3000"),
			database: DatabaseSettings {
				uri: env_or("MONGODB_URI", "mongodb://localhost:27017"),
				name: env_or("MONGODB_DATABASE", "tomados"),
				max_pool_size,
			},
		})
	}
}

fn env_or(key: &str, default: &str) -> String {
	env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> bool {
	matches!(value.trim(), "1" | "true" | "True" | "TRUE" | "yes")
}
