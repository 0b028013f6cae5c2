//! Configuration builder for tests.
//!
//! Produces a valid [`Config`] with an in-memory storage backend and a fixed
//! scenario start date so tests do not depend on the wall clock.

use crate::{ApiConfig, Config, ExportConfig, ScenarioConfig, SimulatorConfig, StorageConfig};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	simulator_id: String,
	scenario: ScenarioConfig,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	api: Option<ApiConfig>,
	export_directory: Option<PathBuf>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a builder with memory storage and a scenario starting on 2025-01-06.
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			simulator_id: "test-simulator".to_string(),
			scenario: ScenarioConfig {
				start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
				..ScenarioConfig::default()
			},
			storage_primary: "memory".to_string(),
			storage_implementations,
			api: None,
			export_directory: None,
		}
	}

	pub fn simulator_id(mut self, id: impl Into<String>) -> Self {
		self.simulator_id = id.into();
		self
	}

	pub fn scenario(mut self, scenario: ScenarioConfig) -> Self {
		self.scenario = scenario;
		self
	}

	/// Uses the file backend rooted at `path` as primary storage.
	pub fn file_storage(mut self, path: impl Into<PathBuf>) -> Self {
		let mut table = toml::map::Map::new();
		table.insert(
			"storage_path".to_string(),
			toml::Value::String(path.into().to_string_lossy().into_owned()),
		);
		self.storage_implementations
			.insert("file".to_string(), toml::Value::Table(table));
		self.storage_primary = "file".to_string();
		self
	}

	pub fn api(mut self, api: Option<ApiConfig>) -> Self {
		self.api = api;
		self
	}

	pub fn export_directory(mut self, directory: impl Into<PathBuf>) -> Self {
		self.export_directory = Some(directory.into());
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			simulator: SimulatorConfig {
				id: self.simulator_id,
			},
			scenario: self.scenario,
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			api: self.api,
			export: self
				.export_directory
				.map(|directory| ExportConfig { directory })
				.unwrap_or_default(),
		}
	}
}
