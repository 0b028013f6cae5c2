//! The result of planning one step: the state changes and where to go next.

use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{CostCategory, Decision, DocumentRecord, Step};

/// One change to apply to the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	/// Record the status selected by a decision.
	Decide(Decision),
	/// Move the current date forward by a number of days.
	AdvanceTimeline(u64),
	/// Assign the amount of a cost category.
	SetCost(CostCategory, u64),
	/// Drop every document except the rejection notice.
	RestartRun,
	/// Store a generated document.
	RecordDocument(DocumentRecord),
}

impl Mutation {
	pub(crate) fn apply(self, state: &mut OrderState) -> Result<(), WorkflowError> {
		match self {
			Mutation::Decide(decision) => state.set_decision(decision),
			Mutation::AdvanceTimeline(days) => state.advance_timeline(days)?,
			Mutation::SetCost(category, amount) => state.set_cost(category, amount),
			Mutation::RestartRun => state.restart_run(),
			Mutation::RecordDocument(record) => {
				let key = record.key();
				if !state.record_document(record) {
					tracing::debug!(
						document = %key,
						"Document already recorded, keeping the first"
					);
				}
			},
		}
		Ok(())
	}
}

/// Planned outcome of advancing from one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub mutations: Vec<Mutation>,
	pub next: Step,
}

impl Transition {
	/// A transition with no effect on the order.
	pub fn to(next: Step) -> Self {
		Self {
			mutations: Vec::new(),
			next,
		}
	}

	pub fn with(mut self, mutation: Mutation) -> Self {
		self.mutations.push(mutation);
		self
	}
}
