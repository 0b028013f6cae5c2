//! Registry hosting many isolated sessions behind opaque ids.
//!
//! Every session keeps its own order. Calls on the registry are serialized by
//! an async read/write lock; a change is only committed to memory after it
//! has been persisted, when a store is configured.

use super::{SessionError, SessionId, SessionSnapshot, SessionStore, SimulatorSession};
use crate::summary::OrderSummary;
use crate::WorkflowError;
use chrono::NaiveDate;
use revcycle_config::ScenarioConfig;
use revcycle_types::{truncate_id, RenderedDocument, Step};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;

pub struct SessionRegistry {
	scenario: ScenarioConfig,
	store: Option<SessionStore>,
	sessions: RwLock<HashMap<SessionId, SimulatorSession>>,
}

impl SessionRegistry {
	pub fn new(scenario: ScenarioConfig, store: Option<SessionStore>) -> Self {
		Self {
			scenario,
			store,
			sessions: RwLock::new(HashMap::new()),
		}
	}

	/// Number of sessions currently held in memory.
	pub async fn len(&self) -> usize {
		self.sessions.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.sessions.read().await.is_empty()
	}

	/// Creates a session whose order starts today unless the scenario fixes a date.
	pub async fn create(&self) -> Result<SessionSnapshot, SessionError> {
		self.create_on(chrono::Local::now().date_naive()).await
	}

	/// Creates a session, using `today` when the scenario has no start date.
	pub async fn create_on(&self, today: NaiveDate) -> Result<SessionSnapshot, SessionError> {
		let session = SimulatorSession::new(self.scenario.to_scenario(today))?;
		if let Some(store) = &self.store {
			store.save(&session).await?;
		}

		let snapshot = session.snapshot();
		self.sessions.write().await.insert(session.id(), session);
		Ok(snapshot)
	}

	pub async fn get(&self, id: &SessionId) -> Result<SessionSnapshot, SessionError> {
		self.ensure_loaded(id).await?;
		let sessions = self.sessions.read().await;
		sessions
			.get(id)
			.map(SimulatorSession::snapshot)
			.ok_or_else(|| SessionError::NotFound(id.to_string()))
	}

	/// Advances a session with an optional textual decision.
	#[instrument(skip_all, fields(session_id = %truncate_id(&id.to_string())))]
	pub async fn advance(
		&self,
		id: &SessionId,
		decision: Option<&str>,
	) -> Result<SessionSnapshot, SessionError> {
		self.update(id, |session| session.advance_with_label(decision).map(|_| ()))
			.await
	}

	#[instrument(skip_all, fields(session_id = %truncate_id(&id.to_string())))]
	pub async fn reset(&self, id: &SessionId) -> Result<SessionSnapshot, SessionError> {
		self.update(id, |session| session.reset().map(|_| ())).await
	}

	/// Drops a session from memory and from the store.
	#[instrument(skip_all, fields(session_id = %truncate_id(&id.to_string())))]
	pub async fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
		let mut sessions = self.sessions.write().await;
		let persisted = match &self.store {
			Some(store) => store.exists(id).await?,
			None => false,
		};
		if !persisted && !sessions.contains_key(id) {
			return Err(SessionError::NotFound(id.to_string()));
		}

		if persisted {
			if let Some(store) = &self.store {
				store.remove(id).await?;
			}
		}
		sessions.remove(id);
		tracing::info!("Session removed");
		Ok(())
	}

	/// Documents of `step` rendered from the session's current order.
	pub async fn documents(
		&self,
		id: &SessionId,
		step: Step,
	) -> Result<Vec<RenderedDocument>, SessionError> {
		self.ensure_loaded(id).await?;
		let sessions = self.sessions.read().await;
		sessions
			.get(id)
			.map(|session| session.documents(step))
			.ok_or_else(|| SessionError::NotFound(id.to_string()))
	}

	pub async fn summary(&self, id: &SessionId) -> Result<OrderSummary, SessionError> {
		self.ensure_loaded(id).await?;
		let sessions = self.sessions.read().await;
		sessions
			.get(id)
			.map(SimulatorSession::summary)
			.ok_or_else(|| SessionError::NotFound(id.to_string()))
	}

	/// Applies `change` to a copy of the session and commits the copy.
	async fn update<F>(&self, id: &SessionId, change: F) -> Result<SessionSnapshot, SessionError>
	where
		F: FnOnce(&mut SimulatorSession) -> Result<(), WorkflowError>,
	{
		self.ensure_loaded(id).await?;

		let mut sessions = self.sessions.write().await;
		let mut working = sessions
			.get(id)
			.cloned()
			.ok_or_else(|| SessionError::NotFound(id.to_string()))?;

		change(&mut working)?;

		if let Some(store) = &self.store {
			store.save(&working).await?;
		}

		let snapshot = working.snapshot();
		sessions.insert(*id, working);
		Ok(snapshot)
	}

	/// Pulls a persisted session into memory if it is not there yet.
	async fn ensure_loaded(&self, id: &SessionId) -> Result<(), SessionError> {
		if self.sessions.read().await.contains_key(id) {
			return Ok(());
		}

		let Some(store) = &self.store else {
			return Err(SessionError::NotFound(id.to_string()));
		};

		let session = store.load(id).await?;
		tracing::info!(session_id = %truncate_id(&id.to_string()), "Session restored");
		self.sessions.write().await.entry(*id).or_insert(session);
		Ok(())
	}
}
