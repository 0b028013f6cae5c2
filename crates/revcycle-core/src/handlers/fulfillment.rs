//! Shipping and billing.

use super::{PRODUCTION_SHIPPING_COST, SHIPPING_DAYS};
use crate::engine::{Mutation, Transition};
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{CostCategory, Decision, InventoryStatus, Step};

/// Orders built to order ship at the higher rate, replacing any earlier charge.
pub fn shipping(
	state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	let mut transition = Transition::to(Step::Billing);
	if state.inventory_status() == InventoryStatus::OutOfStock {
		transition = transition.with(Mutation::SetCost(
			CostCategory::Shipping,
			PRODUCTION_SHIPPING_COST,
		));
	}
	Ok(transition.with(Mutation::AdvanceTimeline(SHIPPING_DAYS)))
}

/// The invoice total is derived when documents are rendered, nothing is stored.
pub fn billing(
	_state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	Ok(Transition::to(Step::Collections))
}
