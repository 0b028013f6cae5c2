//! Configuration module for the revenue cycle simulator.
//!
//! This module provides structures and utilities for managing simulator
//! configuration. Configuration is loaded from TOML files, environment variables
//! referenced as `${VAR}` or `${VAR:-default}` are substituted, and the result is
//! validated before use.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

#[cfg(any(test, feature = "testing"))]
pub mod builders;
mod loader;

use chrono::NaiveDate;
use regex::Regex;
use revcycle_types::Scenario;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
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
		// Keep the message only, not the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the simulator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this simulator deployment.
	pub simulator: SimulatorConfig,
	/// The order being simulated.
	#[serde(default)]
	pub scenario: ScenarioConfig,
	/// Storage backends for session snapshots.
	pub storage: StorageConfig,
	/// HTTP API server. The console walkthrough runs when absent or disabled.
	pub api: Option<ApiConfig>,
	/// Where exported documents are written.
	#[serde(default)]
	pub export: ExportConfig,
}

/// Configuration specific to the simulator instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorConfig {
	/// Identifier used in logs.
	pub id: String,
}

/// The scenario every new session starts from.
///
/// Any field left out falls back to the classroom scenario.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
	pub customer_name: String,
	pub product_name: String,
	pub quantity: u32,
	pub unit_price: u64,
	/// ISO date (`"2025-01-06"`); sessions start today when unset.
	pub start_date: Option<NaiveDate>,
	pub shipping_address: String,
}

impl Default for ScenarioConfig {
	fn default() -> Self {
		let defaults = Scenario::bikeworld(NaiveDate::MIN);
		Self {
			customer_name: defaults.customer_name,
			product_name: defaults.product_name,
			quantity: defaults.quantity,
			unit_price: defaults.unit_price,
			start_date: None,
			shipping_address: defaults.shipping_address,
		}
	}
}

impl ScenarioConfig {
	/// Builds the scenario, starting on `today` unless a start date is configured.
	pub fn to_scenario(&self, today: NaiveDate) -> Scenario {
		Scenario {
			customer_name: self.customer_name.clone(),
			product_name: self.product_name.clone(),
			quantity: self.quantity,
			unit_price: self.unit_price,
			start_date: self.start_date.unwrap_or(today),
			shipping_address: self.shipping_address.clone(),
		}
	}
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
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
}

/// Configuration for document export.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
	/// Directory exported Markdown documents are written to.
	#[serde(default = "default_export_directory")]
	pub directory: PathBuf,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			directory: default_export_directory(),
		}
	}
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

fn default_export_directory() -> PathBuf {
	PathBuf::from("./exports")
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}
	result.push_str(&input[last..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// - Simulator ID is not empty
	/// - Scenario names are set and quantity and unit price are positive
	/// - The order value fits in a u64
	/// - The primary storage implementation is configured
	fn validate(&self) -> Result<(), ConfigError> {
		if self.simulator.id.is_empty() {
			return Err(ConfigError::Validation(
				"Simulator ID cannot be empty".into(),
			));
		}

		let scenario = &self.scenario;
		if scenario.customer_name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Scenario customer_name cannot be empty".into(),
			));
		}
		if scenario.product_name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Scenario product_name cannot be empty".into(),
			));
		}
		if scenario.quantity == 0 {
			return Err(ConfigError::Validation(
				"Scenario quantity must be greater than 0".into(),
			));
		}
		if scenario.unit_price == 0 {
			return Err(ConfigError::Validation(
				"Scenario unit_price must be greater than 0".into(),
			));
		}
		if scenario
			.unit_price
			.checked_mul(u64::from(scenario.quantity))
			.is_none()
		{
			return Err(ConfigError::Validation(
				"Scenario order value overflows".into(),
			));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
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

		if let Some(api) = &self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation(
					"API port cannot be 0 when the API is enabled".into(),
				));
			}
		}

		Ok(())
	}
}

/// Parses and validates a configuration from a TOML string.
///
/// Environment variables are resolved before parsing.
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
[simulator]
id = "classroom"

[storage]
primary = "memory"
[storage.implementations.memory]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("REVCYCLE_TEST_HOST", "localhost");
		std::env::set_var("REVCYCLE_TEST_PORT", "8080");

		let input = "host = \"${REVCYCLE_TEST_HOST}:${REVCYCLE_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:8080\"");

		std::env::remove_var("REVCYCLE_TEST_HOST");
		std::env::remove_var("REVCYCLE_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${REVCYCLE_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${REVCYCLE_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("REVCYCLE_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_uses_classroom_scenario() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.simulator.id, "classroom");
		assert_eq!(config.scenario.customer_name, "BikeWorld Wholesale");
		assert_eq!(config.scenario.quantity, 100);
		assert_eq!(config.scenario.unit_price, 500);
		assert!(config.scenario.start_date.is_none());
		assert!(config.api.is_none());
		assert_eq!(config.export.directory, PathBuf::from("./exports"));
	}

	#[test]
	fn test_scenario_overrides_and_start_date() {
		let config_str = format!(
			"{}\n[scenario]\nquantity = 40\nstart_date = \"2025-03-03\"\n",
			MINIMAL
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.scenario.quantity, 40);
		assert_eq!(config.scenario.product_name, "Mountain Bike (Black)");

		let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
		let scenario = config.scenario.to_scenario(today);
		assert_eq!(
			scenario.start_date,
			NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
		);
	}

	#[test]
	fn test_zero_quantity_rejected() {
		let config_str = format!("{}\n[scenario]\nquantity = 0\n", MINIMAL);
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("quantity"));
	}

	#[test]
	fn test_unknown_primary_storage_rejected() {
		let config_str = r#"
[simulator]
id = "classroom"

[storage]
primary = "file"
[storage.implementations.memory]
"#;
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Primary storage 'file'"));
	}

	#[test]
	fn test_api_defaults() {
		let config_str = format!("{}\n[api]\nenabled = true\n", MINIMAL);
		let config: Config = config_str.parse().unwrap();
		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.port, 3000);
	}
}
