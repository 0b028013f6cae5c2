//! Builder for assembling a simulator from configuration.
//!
//! Storage backends are plugged in through factory functions keyed by
//! implementation name, so the binary decides which backends exist and the
//! configuration decides which one is used.

use crate::session::{SessionRegistry, SessionStore};
use crate::Simulator;
use revcycle_config::Config;
use revcycle_storage::{StorageError, StorageInterface, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building a simulator.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions needed to build a simulator.
pub struct SimulatorFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing a [`Simulator`] with pluggable storage.
pub struct SimulatorBuilder {
	config: Config,
}

impl SimulatorBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	pub fn build<SF>(self, factories: SimulatorFactories<SF>) -> Result<Simulator, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
	{
		let primary = &self.config.storage.primary;
		let storage_config = self
			.config
			.storage
			.implementations
			.get(primary)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary storage '{}' has no configuration",
					primary
				))
			})?;

		let factory = factories.storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!("storage implementation '{}'", primary))
		})?;

		let backend = match factory(storage_config) {
			Ok(backend) => backend,
			Err(e) => {
				tracing::error!(
					component = "storage",
					implementation = %primary,
					error = %e,
					"Failed to create storage implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create storage implementation '{}': {}",
					primary, e
				)));
			},
		};
		tracing::info!(component = "storage", implementation = %primary, "Loaded");

		let store = SessionStore::new(Arc::new(StorageService::new(backend)));
		let registry = Arc::new(SessionRegistry::new(
			self.config.scenario.clone(),
			Some(store.clone()),
		));

		Ok(Simulator {
			config: self.config,
			registry,
			store,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use revcycle_config::builders::ConfigBuilder;
	use revcycle_storage::get_all_implementations;
	use tempfile::TempDir;

	fn factories() -> SimulatorFactories<revcycle_storage::StorageFactory> {
		SimulatorFactories {
			storage_factories: get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}

	#[tokio::test]
	async fn test_build_with_memory_storage() {
		let simulator = SimulatorBuilder::new(ConfigBuilder::new().build())
			.build(factories())
			.unwrap();

		assert_eq!(simulator.config().simulator.id, "test-simulator");
		let snapshot = simulator.registry().create().await.unwrap();
		assert!(simulator.store().exists(&snapshot.id).await.unwrap());
	}

	#[tokio::test]
	async fn test_build_with_file_storage() {
		let temp_dir = TempDir::new().unwrap();
		let config = ConfigBuilder::new()
			.file_storage(temp_dir.path().join("sessions"))
			.build();
		let simulator = SimulatorBuilder::new(config).build(factories()).unwrap();

		let session = simulator.start_session().unwrap();
		simulator.store().save(&session).await.unwrap();
		assert!(temp_dir.path().join("sessions").read_dir().unwrap().count() == 1);
	}

	#[test]
	fn test_missing_factory() {
		let empty: SimulatorFactories<revcycle_storage::StorageFactory> = SimulatorFactories {
			storage_factories: HashMap::new(),
		};
		let result = SimulatorBuilder::new(ConfigBuilder::new().build()).build(empty);
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}
}
