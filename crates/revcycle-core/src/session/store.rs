//! Persistence of session snapshots through the storage service.

use super::{SessionError, SessionId, SessionSnapshot, SimulatorSession};
use revcycle_storage::{StorageError, StorageService};
use revcycle_types::{truncate_id, StorageKey};
use std::sync::Arc;

/// Saves and restores sessions under the `sessions` namespace.
#[derive(Clone)]
pub struct SessionStore {
	storage: Arc<StorageService>,
}

impl SessionStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Stores the session's current snapshot, replacing any earlier one.
	pub async fn save(&self, session: &SimulatorSession) -> Result<(), SessionError> {
		let snapshot = session.snapshot();
		let id = snapshot.id.to_string();
		self.storage
			.store(StorageKey::Sessions.as_str(), &id, &snapshot)
			.await
			.map_err(|e| SessionError::Storage(e.to_string()))?;
		tracing::info!(
			session_id = %truncate_id(&id),
			step = snapshot.state.current_step().id(),
			"Session persisted"
		);
		Ok(())
	}

	pub async fn load(&self, id: &SessionId) -> Result<SimulatorSession, SessionError> {
		let snapshot: SessionSnapshot = self
			.storage
			.retrieve(StorageKey::Sessions.as_str(), &id.to_string())
			.await
			.map_err(|e| match e {
				StorageError::NotFound => SessionError::NotFound(id.to_string()),
				other => SessionError::Storage(other.to_string()),
			})?;
		Ok(SimulatorSession::from_snapshot(snapshot)?)
	}

	pub async fn exists(&self, id: &SessionId) -> Result<bool, SessionError> {
		self.storage
			.exists(StorageKey::Sessions.as_str(), &id.to_string())
			.await
			.map_err(|e| SessionError::Storage(e.to_string()))
	}

	pub async fn remove(&self, id: &SessionId) -> Result<(), SessionError> {
		self.storage
			.remove(StorageKey::Sessions.as_str(), &id.to_string())
			.await
			.map_err(|e| SessionError::Storage(e.to_string()))
	}
}
