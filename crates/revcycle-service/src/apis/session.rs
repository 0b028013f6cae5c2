//! Session endpoints: create, inspect, advance, reset and delete a simulated order.
//!
//! Responses carry the order state together with what presentation needs to
//! render the current step: its metadata, decision options, documents and the
//! progress summary.

use revcycle_core::{
	render_documents, OrderState, OrderSummary, SessionError, SessionId, SessionRegistry,
	SessionSnapshot, WorkflowError,
};
use revcycle_types::{APIError, AdvanceRequest, Decision, RenderedDocument, Step};
use serde::Serialize;

/// Everything a client needs to render a session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
	pub id: SessionId,
	pub step: StepView,
	pub state: OrderState,
	pub documents: Vec<RenderedDocument>,
	pub summary: OrderSummary,
}

/// Metadata of the current step.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
	pub id: u8,
	pub name: &'static str,
	pub role: &'static str,
	pub scenario_input: &'static str,
	pub requires_decision: bool,
	pub options: Vec<&'static str>,
	pub terminal: bool,
}

impl StepView {
	fn new(step: Step) -> Self {
		Self {
			id: step.id(),
			name: step.name(),
			role: step.role(),
			scenario_input: step.scenario_input(),
			requires_decision: step.requires_decision(),
			options: Decision::options(step).iter().map(|d| d.label()).collect(),
			terminal: step.is_terminal(),
		}
	}
}

impl From<SessionSnapshot> for SessionView {
	fn from(snapshot: SessionSnapshot) -> Self {
		let step = snapshot.state.current_step();
		Self {
			id: snapshot.id,
			step: StepView::new(step),
			documents: render_documents(step, &snapshot.state),
			summary: OrderSummary::from_state(&snapshot.state),
			state: snapshot.state,
		}
	}
}

pub async fn create_session(registry: &SessionRegistry) -> Result<SessionView, APIError> {
	let snapshot = registry.create().await.map_err(to_api_error)?;
	tracing::info!(session_id = %snapshot.id, "Created session over API");
	Ok(snapshot.into())
}

pub async fn get_session(registry: &SessionRegistry, id: &str) -> Result<SessionView, APIError> {
	let id = parse_id(id)?;
	registry.get(&id).await.map(Into::into).map_err(to_api_error)
}

pub async fn advance_session(
	registry: &SessionRegistry,
	id: &str,
	request: AdvanceRequest,
) -> Result<SessionView, APIError> {
	let id = parse_id(id)?;
	registry
		.advance(&id, request.decision.as_deref())
		.await
		.map(Into::into)
		.map_err(to_api_error)
}

pub async fn reset_session(registry: &SessionRegistry, id: &str) -> Result<SessionView, APIError> {
	let id = parse_id(id)?;
	registry.reset(&id).await.map(Into::into).map_err(to_api_error)
}

pub async fn delete_session(registry: &SessionRegistry, id: &str) -> Result<(), APIError> {
	let id = parse_id(id)?;
	registry.remove(&id).await.map_err(to_api_error)
}

pub async fn step_documents(
	registry: &SessionRegistry,
	id: &str,
	step: &str,
) -> Result<Vec<RenderedDocument>, APIError> {
	let id = parse_id(id)?;
	let step = step.parse::<Step>().map_err(|e| APIError::NotFound {
		error_type: "STEP_NOT_FOUND".to_string(),
		message: e.to_string(),
	})?;
	registry.documents(&id, step).await.map_err(to_api_error)
}

fn parse_id(id: &str) -> Result<SessionId, APIError> {
	id.parse().map_err(to_api_error)
}

/// Maps session failures onto HTTP errors.
pub fn to_api_error(error: SessionError) -> APIError {
	let message = error.to_string();
	match error {
		SessionError::Workflow(WorkflowError::InvalidDecision { step, .. }) => {
			APIError::BadRequest {
				error_type: "INVALID_DECISION".to_string(),
				message,
				details: Some(serde_json::json!({
					"step": step.id(),
					"options": Decision::options(step)
						.iter()
						.map(|d| d.label())
						.collect::<Vec<_>>(),
				})),
			}
		},
		SessionError::Workflow(WorkflowError::InvalidState(_)) => APIError::Conflict {
			error_type: "INVALID_STATE".to_string(),
			message,
		},
		SessionError::Workflow(WorkflowError::InvariantViolation(_)) => {
			APIError::InternalServerError {
				error_type: "INVARIANT_VIOLATION".to_string(),
				message,
			}
		},
		SessionError::NotFound(_) => APIError::NotFound {
			error_type: "SESSION_NOT_FOUND".to_string(),
			message,
		},
		SessionError::InvalidId(_) => APIError::BadRequest {
			error_type: "INVALID_SESSION_ID".to_string(),
			message,
			details: None,
		},
		SessionError::Storage(_) => APIError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message,
		},
		SessionError::Export(_) => APIError::InternalServerError {
			error_type: "EXPORT_ERROR".to_string(),
			message,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_status_mapping() {
		let invalid = to_api_error(SessionError::Workflow(WorkflowError::InvalidDecision {
			step: Step::CreditCheck,
			reason: "missing".to_string(),
		}));
		assert_eq!(invalid.status_code(), 400);
		let body = invalid.to_error_response();
		assert_eq!(body.error, "INVALID_DECISION");
		assert_eq!(
			body.details.unwrap()["options"],
			serde_json::json!(["Approve", "Reject"])
		);

		let terminal = to_api_error(SessionError::Workflow(WorkflowError::InvalidState(
			"terminal".to_string(),
		)));
		assert_eq!(terminal.status_code(), 409);

		let broken = to_api_error(SessionError::Workflow(WorkflowError::InvariantViolation(
			"overflow".to_string(),
		)));
		assert_eq!(broken.status_code(), 500);

		assert_eq!(
			to_api_error(SessionError::NotFound("x".to_string())).status_code(),
			404
		);
		assert_eq!(
			to_api_error(SessionError::InvalidId("x".to_string())).status_code(),
			400
		);
	}

	#[test]
	fn test_step_view_options() {
		let view = StepView::new(Step::Inventory);
		assert_eq!(view.options, vec!["In Stock", "Out of Stock"]);
		assert!(view.requires_decision);
		assert_eq!(view.role, "Inventory Manager");

		let view = StepView::new(Step::Collections);
		assert!(view.options.is_empty());
		assert!(view.terminal);
	}
}
