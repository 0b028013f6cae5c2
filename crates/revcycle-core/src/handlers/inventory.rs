//! Finished goods inventory check.

use super::{INVENTORY_CHECK_DAYS, STOCK_SHIPPING_COST};
use crate::engine::{Mutation, Transition};
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{CostCategory, Decision, InventoryDecision, Step};

/// In stock ships straight away; out of stock raises a back order.
pub fn inventory_check(
	_state: &OrderState,
	decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	let choice = match decision {
		Some(Decision::Inventory(choice)) => choice,
		Some(other) => {
			return Err(WorkflowError::InvalidDecision {
				step: Step::Inventory,
				reason: format!("'{}' is not an inventory decision", other),
			})
		},
		None => return Err(WorkflowError::missing_decision(Step::Inventory)),
	};

	let transition = match choice {
		InventoryDecision::InStock => Transition::to(Step::Shipping)
			.with(Mutation::Decide(Decision::Inventory(choice)))
			.with(Mutation::SetCost(CostCategory::Shipping, STOCK_SHIPPING_COST))
			.with(Mutation::AdvanceTimeline(INVENTORY_CHECK_DAYS)),
		InventoryDecision::OutOfStock => Transition::to(Step::BackOrder)
			.with(Mutation::Decide(Decision::Inventory(choice)))
			.with(Mutation::AdvanceTimeline(INVENTORY_CHECK_DAYS)),
	};
	Ok(transition)
}
