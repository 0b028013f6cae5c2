//! Back order, procurement and production.

use super::{
	MATERIALS_CHECK_DAYS, PROCUREMENT_COST, PROCUREMENT_DAYS, PRODUCTION_COST, PRODUCTION_DAYS,
};
use crate::engine::{Mutation, Transition};
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{CostCategory, Decision, MaterialsDecision, Step};

/// Raw materials on hand go straight to production; otherwise they are bought.
pub fn back_order(
	_state: &OrderState,
	decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	let choice = match decision {
		Some(Decision::Materials(choice)) => choice,
		Some(other) => {
			return Err(WorkflowError::InvalidDecision {
				step: Step::BackOrder,
				reason: format!("'{}' is not a raw materials decision", other),
			})
		},
		None => return Err(WorkflowError::missing_decision(Step::BackOrder)),
	};

	let transition = match choice {
		MaterialsDecision::Available => Transition::to(Step::Production)
			.with(Mutation::Decide(Decision::Materials(choice)))
			.with(Mutation::SetCost(CostCategory::Production, PRODUCTION_COST))
			.with(Mutation::AdvanceTimeline(MATERIALS_CHECK_DAYS)),
		MaterialsDecision::NotAvailable => Transition::to(Step::Procurement)
			.with(Mutation::Decide(Decision::Materials(choice)))
			.with(Mutation::AdvanceTimeline(MATERIALS_CHECK_DAYS)),
	};
	Ok(transition)
}

pub fn procurement(
	_state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	Ok(Transition::to(Step::Production)
		.with(Mutation::SetCost(CostCategory::Procurement, PROCUREMENT_COST))
		.with(Mutation::AdvanceTimeline(PROCUREMENT_DAYS)))
}

/// The production cost is assigned, so reaching this step through the
/// materials-available skip does not charge it twice.
pub fn production(
	_state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	Ok(Transition::to(Step::Shipping)
		.with(Mutation::SetCost(CostCategory::Production, PRODUCTION_COST))
		.with(Mutation::AdvanceTimeline(PRODUCTION_DAYS)))
}
