//! Core of the revenue cycle simulator.
//!
//! The order record ([`OrderState`]) is driven through the ten steps of the
//! order-to-cash cycle by the [`WorkflowEngine`]. Everything around it
//! (documents, summaries, sessions and the builder) derives from or wraps that
//! pair.

pub mod builder;
pub mod documents;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;
pub mod summary;

pub use builder::{BuilderError, SimulatorBuilder, SimulatorFactories};
pub use documents::{render_document_fields, render_documents};
pub use engine::{Mutation, Transition, WorkflowEngine};
pub use error::WorkflowError;
pub use session::{
	SessionError, SessionId, SessionRegistry, SessionSnapshot, SessionStore, SimulatorSession,
};
pub use state::OrderState;
pub use summary::OrderSummary;

use revcycle_config::Config;
use std::sync::Arc;

/// A configured simulator: settings, session registry and session store.
pub struct Simulator {
	config: Config,
	registry: Arc<SessionRegistry>,
	store: SessionStore,
}

impl Simulator {
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Registry hosting the sessions served over the API.
	pub fn registry(&self) -> &Arc<SessionRegistry> {
		&self.registry
	}

	pub fn store(&self) -> &SessionStore {
		&self.store
	}

	/// Starts a standalone session from the configured scenario.
	pub fn start_session(&self) -> Result<SimulatorSession, WorkflowError> {
		let today = chrono::Local::now().date_naive();
		SimulatorSession::new(self.config.scenario.to_scenario(today))
	}

	/// Loads a previously saved session.
	pub async fn resume_session(&self, id: &SessionId) -> Result<SimulatorSession, SessionError> {
		self.store.load(id).await
	}
}
