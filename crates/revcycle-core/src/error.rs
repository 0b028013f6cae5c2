//! Errors raised while advancing an order through the workflow.

use revcycle_types::{DecisionError, Step};
use thiserror::Error;

/// Errors that can occur during workflow operations.
///
/// All of them are recoverable from the caller's point of view: a failed
/// `advance` leaves the order untouched, so presentation can re-prompt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
	/// The decision is missing or not one of the step's options.
	#[error("Invalid decision at step {step}: {reason}")]
	InvalidDecision { step: Step, reason: String },
	/// The operation is not allowed in the current state.
	#[error("Invalid state: {0}")]
	InvalidState(String),
	/// A construction or date invariant could not be upheld.
	#[error("Invariant violation: {0}")]
	InvariantViolation(String),
}

impl WorkflowError {
	pub(crate) fn missing_decision(step: Step) -> Self {
		let options = revcycle_types::Decision::options(step)
			.iter()
			.map(|o| o.label())
			.collect::<Vec<_>>()
			.join(", ");
		WorkflowError::InvalidDecision {
			step,
			reason: format!("a decision is required, expected one of: {}", options),
		}
	}
}

impl From<DecisionError> for WorkflowError {
	fn from(err: DecisionError) -> Self {
		match err {
			DecisionError::NotRequired(step) => WorkflowError::InvalidDecision {
				step,
				reason: "this step does not take a decision".to_string(),
			},
			DecisionError::UnknownOption { step, .. } => WorkflowError::InvalidDecision {
				step,
				reason: err.to_string(),
			},
		}
	}
}
