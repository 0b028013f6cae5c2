//! Main entry point for the revenue cycle simulator.
//!
//! Without an enabled `[api]` section the binary walks one order through the
//! order-to-cash cycle on the console. With it, sessions are served over HTTP.
//! Storage backends are wired in here and selected by configuration.

use clap::Parser;
use revcycle_config::Config;
use revcycle_core::{SessionId, Simulator, SimulatorBuilder, SimulatorFactories};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod console;
mod server;

use revcycle_storage::implementations::file::create_storage as create_file_storage;
use revcycle_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the simulator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/demo.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	/// Resume a saved console session instead of starting a new order
	#[arg(short, long)]
	session: Option<String>,

	/// Directory for exported documents, overriding the configuration
	#[arg(long)]
	export_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	// The console owns stdout
	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.simulator.id);

	let simulator = Arc::new(build_simulator(config.clone())?);

	match config.api.filter(|api| api.enabled) {
		Some(api_config) => {
			tracing::info!("Starting API server");
			server::start_server(api_config, simulator).await?;
		},
		None => {
			let export_dir = args
				.export_dir
				.unwrap_or_else(|| config.export.directory.clone());
			run_console(&simulator, args.session.as_deref(), export_dir).await?;
		},
	}

	tracing::info!("Stopped simulator");
	Ok(())
}

/// Runs the console walkthrough on stdin/stdout.
async fn run_console(
	simulator: &Simulator,
	session: Option<&str>,
	export_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
	let session = match session {
		Some(id) => {
			let id: SessionId = id.parse()?;
			let session = simulator.resume_session(&id).await?;
			tracing::info!(session_id = %id, step = %session.current_step(), "Resumed session");
			session
		},
		None => simulator.start_session()?,
	};

	let input = tokio::io::BufReader::new(tokio::io::stdin());
	let output = tokio::io::stdout();
	let mut console = console::Console::new(input, output, simulator.store().clone(), export_dir);
	let session = console.run(session).await?;

	println!("\nSession {} saved at step {}.", session.id(), session.current_step());
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the simulator with the available storage backends.
fn build_simulator(config: Config) -> Result<Simulator, Box<dyn std::error::Error>> {
	let builder = SimulatorBuilder::new(config);

	let storage_factories = create_factory_map!(
		revcycle_storage::StorageInterface,
		revcycle_storage::StorageError,
		"file" => create_file_storage,
		"memory" => create_memory_storage,
	);

	let factories = SimulatorFactories { storage_factories };

	Ok(builder.build(factories)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use revcycle_config::{ScenarioConfig, SimulatorConfig, StorageConfig};
	use revcycle_core::SimulatorSession;
	use std::collections::HashMap;
	use tempfile::tempdir;
	use toml::Value;

	/// Creates a minimal test configuration for unit testing
	fn create_test_config() -> Config {
		Config {
			simulator: SimulatorConfig {
				id: "test-simulator".to_string(),
			},
			scenario: ScenarioConfig::default(),
			storage: StorageConfig {
				primary: "memory".to_string(),
				implementations: {
					let mut map = HashMap::new();
					map.insert("memory".to_string(), Value::Table(toml::map::Map::new()));
					map
				},
			},
			api: None,
			export: Default::default(),
		}
	}

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["revcycle"]);

		assert_eq!(args.config, PathBuf::from("config/demo.toml"));
		assert_eq!(args.log_level, "warn");
		assert!(args.session.is_none());
		assert!(args.export_dir.is_none());
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from([
			"revcycle",
			"--config",
			"custom.toml",
			"--log-level",
			"debug",
			"--session",
			"6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b",
			"--export-dir",
			"out",
		]);

		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		assert_eq!(
			args.session.as_deref(),
			Some("6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b")
		);
		assert_eq!(args.export_dir, Some(PathBuf::from("out")));
	}

	#[test]
	fn test_create_factory_map_multiple_entries() {
		use revcycle_storage::implementations::{
			file::create_storage as create_file, memory::create_storage as create_memory,
		};
		use revcycle_storage::{StorageError, StorageInterface};

		let factories = create_factory_map!(
			StorageInterface,
			StorageError,
			"memory" => create_memory,
			"file" => create_file,
		);

		assert_eq!(factories.len(), 2);
		assert!(factories.contains_key("memory"));
		assert!(factories.contains_key("file"));
	}

	#[tokio::test]
	async fn test_build_simulator_with_minimal_config() {
		let simulator = build_simulator(create_test_config()).unwrap();
		assert_eq!(simulator.config().simulator.id, "test-simulator");

		let session = simulator.start_session().unwrap();
		simulator.store().save(&session).await.unwrap();
		let resumed = simulator.resume_session(&session.id()).await.unwrap();
		assert_eq!(resumed.state(), session.state());
	}

	#[test]
	fn test_build_simulator_unknown_backend() {
		let mut config = create_test_config();
		config.storage.primary = "redis".to_string();
		config
			.storage
			.implementations
			.insert("redis".to_string(), Value::Table(toml::map::Map::new()));

		assert!(build_simulator(config).is_err());
	}

	#[tokio::test]
	async fn test_demo_config_loads() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/demo.toml");
		let config = Config::from_file(path).await.unwrap();

		assert_eq!(config.simulator.id, "revcycle-demo");
		assert_eq!(config.storage.primary, "file");
		assert_eq!(config.scenario.quantity, 100);
		assert!(config.api.is_some());
	}

	#[tokio::test]
	async fn test_build_simulator_with_file_config() {
		let temp_dir = tempdir().unwrap();
		let config_path = temp_dir.path().join("test_config.toml");
		let sessions_dir = temp_dir.path().join("sessions");

		let config_content = format!(
			r#"
[simulator]
id = "test-file-simulator"

[scenario]
customer_name = "Spoke & Chain"
quantity = 5
start_date = "2025-03-03"

[storage]
primary = "file"
[storage.implementations.file]
storage_path = "{}"
"#,
			sessions_dir.display()
		);
		std::fs::write(&config_path, config_content).unwrap();

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.simulator.id, "test-file-simulator");
		assert_eq!(config.scenario.quantity, 5);

		let simulator = build_simulator(config).unwrap();
		let session: SimulatorSession = simulator.start_session().unwrap();
		assert_eq!(session.state().customer_name(), "Spoke & Chain");
		assert_eq!(session.state().total_value(), 2_500);

		simulator.store().save(&session).await.unwrap();
		assert_eq!(sessions_dir.read_dir().unwrap().count(), 1);
	}
}
