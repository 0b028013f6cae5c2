//! Sessions: one learner working through one order.
//!
//! A [`SimulatorSession`] owns its order outright and is the handle
//! presentation talks to. Many sessions can be hosted side by side in a
//! [`SessionRegistry`], and saved through a [`SessionStore`].

pub mod registry;
pub mod store;

pub use registry::SessionRegistry;
pub use store::SessionStore;

use crate::documents;
use crate::engine::WorkflowEngine;
use crate::state::OrderState;
use crate::summary::OrderSummary;
use crate::WorkflowError;
use revcycle_types::{Decision, DocumentField, RenderedDocument, Scenario, Step};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while managing sessions.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error(transparent)]
	Workflow(#[from] WorkflowError),
	#[error("Session not found: {0}")]
	NotFound(String),
	#[error("Invalid session id: {0}")]
	InvalidId(String),
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Export error: {0}")]
	Export(String),
}

/// Opaque handle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for SessionId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for SessionId {
	type Err = SessionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s.trim())
			.map(Self)
			.map_err(|_| SessionError::InvalidId(s.to_string()))
	}
}

/// Serializable image of a session, used for persistence and API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
	pub id: SessionId,
	pub scenario: Scenario,
	pub state: OrderState,
}

/// A single order in progress together with the scenario it was built from.
#[derive(Debug, Clone)]
pub struct SimulatorSession {
	id: SessionId,
	scenario: Scenario,
	engine: WorkflowEngine,
	state: OrderState,
}

impl SimulatorSession {
	/// Starts a session on a fresh order.
	pub fn new(scenario: Scenario) -> Result<Self, WorkflowError> {
		let engine = WorkflowEngine::new();
		let state = engine.start(&scenario)?;
		let id = SessionId::new();
		tracing::info!(session_id = %id, customer = %scenario.customer_name, "Session created");
		Ok(Self {
			id,
			scenario,
			engine,
			state,
		})
	}

	/// Restores a session from a saved snapshot.
	///
	/// Fails with `InvariantViolation` when the saved order breaks the value or
	/// delivery invariants.
	pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, WorkflowError> {
		snapshot.state.validate()?;
		Ok(Self {
			id: snapshot.id,
			scenario: snapshot.scenario,
			engine: WorkflowEngine::new(),
			state: snapshot.state,
		})
	}

	pub fn id(&self) -> SessionId {
		self.id
	}

	pub fn scenario(&self) -> &Scenario {
		&self.scenario
	}

	/// Read-only view of the order.
	pub fn state(&self) -> &OrderState {
		&self.state
	}

	pub fn current_step(&self) -> Step {
		self.state.current_step()
	}

	/// Advances the order; on error nothing changes.
	pub fn advance(&mut self, decision: Option<Decision>) -> Result<Step, WorkflowError> {
		self.engine.advance(&mut self.state, decision)
	}

	/// Advances with a textual decision such as "Out of Stock".
	///
	/// The label is only parsed at steps that take a decision and is ignored
	/// elsewhere.
	pub fn advance_with_label(&mut self, label: Option<&str>) -> Result<Step, WorkflowError> {
		let step = self.state.current_step();
		let decision = match label.map(str::trim).filter(|l| !l.is_empty()) {
			Some(label) if step.requires_decision() => Some(Decision::parse_for(step, label)?),
			Some(label) => {
				tracing::debug!(step = %step, label, "Ignoring decision label");
				None
			},
			None => None,
		};
		self.advance(decision)
	}

	/// Discards the order and starts again from the same scenario.
	pub fn reset(&mut self) -> Result<&OrderState, WorkflowError> {
		self.state = self.engine.start(&self.scenario)?;
		tracing::info!(session_id = %self.id, "Session reset");
		Ok(&self.state)
	}

	/// Ordered fields of all documents of `step` for the current order.
	pub fn render_document_fields(&self, step: Step) -> Vec<DocumentField> {
		documents::render_document_fields(step, &self.state)
	}

	pub fn documents(&self, step: Step) -> Vec<RenderedDocument> {
		documents::render_documents(step, &self.state)
	}

	pub fn current_documents(&self) -> Vec<RenderedDocument> {
		self.documents(self.state.current_step())
	}

	/// Writes the current step's documents as Markdown files into `directory`.
	pub async fn export_current_documents(
		&self,
		directory: &Path,
	) -> Result<Vec<PathBuf>, SessionError> {
		let documents = self.current_documents();
		let written = documents::export::export_documents(directory, &documents)
			.await
			.map_err(|e| SessionError::Export(format!("{}: {}", directory.display(), e)))?;
		tracing::info!(
			session_id = %self.id,
			count = written.len(),
			directory = %directory.display(),
			"Documents exported"
		);
		Ok(written)
	}

	pub fn summary(&self) -> OrderSummary {
		OrderSummary::from_state(&self.state)
	}

	pub fn snapshot(&self) -> SessionSnapshot {
		SessionSnapshot {
			id: self.id,
			scenario: self.scenario.clone(),
			state: self.state.clone(),
		}
	}
}
