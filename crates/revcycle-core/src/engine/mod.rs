//! Workflow engine that moves an order through the revenue cycle.
//!
//! The engine owns the transition table mapping each step to its handler.
//! Advancing is done in two phases: the handler plans a [`Transition`] from a
//! read-only view of the order, then the engine applies it to a working copy
//! and commits the copy only if every mutation succeeded.

pub mod transition;

pub use transition::{Mutation, Transition};

use crate::documents;
use crate::handlers::{credit, fulfillment, inventory, sales, supply, StepHandler};
use crate::state::OrderState;
use crate::WorkflowError;
use once_cell::sync::Lazy;
use revcycle_types::{Decision, DocumentRecord, Scenario, Step};
use std::collections::HashMap;
use tracing::instrument;

// Collections is terminal and has no handler
static TRANSITIONS: Lazy<HashMap<Step, StepHandler>> = Lazy::new(|| {
	let mut m: HashMap<Step, StepHandler> = HashMap::new();
	m.insert(Step::Inquiry, sales::inquiry);
	m.insert(Step::OrderPlacement, sales::order_placement);
	m.insert(Step::CreditCheck, credit::credit_check);
	m.insert(Step::Inventory, inventory::inventory_check);
	m.insert(Step::BackOrder, supply::back_order);
	m.insert(Step::Procurement, supply::procurement);
	m.insert(Step::Production, supply::production);
	m.insert(Step::Shipping, fulfillment::shipping);
	m.insert(Step::Billing, fulfillment::billing);
	m
});

/// Stateless engine driving an [`OrderState`] through the ten steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowEngine;

impl WorkflowEngine {
	pub fn new() -> Self {
		Self
	}

	/// Builds a fresh order at the first step with that step's documents issued.
	pub fn start(&self, scenario: &Scenario) -> Result<OrderState, WorkflowError> {
		let mut state = OrderState::new(scenario)?;
		record_entered_documents(&mut state);
		Ok(state)
	}

	/// Plans the transition out of the current step without touching the order.
	pub fn plan(
		&self,
		state: &OrderState,
		decision: Option<Decision>,
	) -> Result<Transition, WorkflowError> {
		let step = state.current_step();
		if step.is_terminal() {
			return Err(WorkflowError::InvalidState(format!(
				"step {} is terminal, reset to start a new order",
				step
			)));
		}

		let decision = if step.requires_decision() {
			match decision {
				Some(d) if d.step() == step => Some(d),
				Some(d) => {
					return Err(WorkflowError::InvalidDecision {
						step,
						reason: format!("'{}' does not belong to this step", d),
					})
				},
				None => return Err(WorkflowError::missing_decision(step)),
			}
		} else {
			if let Some(d) = decision {
				tracing::debug!(
					step = %step,
					decision = %d,
					"Ignoring decision at a step that takes none"
				);
			}
			None
		};

		let handler = TRANSITIONS.get(&step).ok_or_else(|| {
			WorkflowError::InvalidState(format!("no handler registered for step {}", step))
		})?;
		handler(state, decision)
	}

	/// Applies the current step's effects and moves to the next step.
	///
	/// On error the order is left exactly as it was.
	#[instrument(skip_all, fields(step = state.current_step().id()))]
	pub fn advance(
		&self,
		state: &mut OrderState,
		decision: Option<Decision>,
	) -> Result<Step, WorkflowError> {
		let Transition { mutations, next } = self.plan(state, decision)?;

		let mut working = state.clone();
		for mutation in mutations {
			mutation.apply(&mut working)?;
		}
		working.set_step(next);
		record_entered_documents(&mut working);

		*state = working;
		tracing::info!(
			next = next.id(),
			current_date = %state.current_date(),
			total_cost = state.costs().total(),
			"Advanced"
		);
		Ok(next)
	}
}

/// Issues the documents of the step the order just entered.
fn record_entered_documents(state: &mut OrderState) {
	let issued_on = state.current_date();
	for document in documents::render_documents(state.current_step(), state) {
		let key = document.key;
		if !state.record_document(DocumentRecord::new(document, issued_on)) {
			tracing::debug!(document = %key, "Document already recorded, keeping the first");
		}
	}
}
