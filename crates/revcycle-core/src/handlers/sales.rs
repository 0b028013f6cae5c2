//! Sales steps: the inquiry and the customer's purchase order.
//!
//! Neither step changes the order; both simply hand over to the next one.

use crate::engine::Transition;
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{Decision, Step};

pub fn inquiry(
	_state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	Ok(Transition::to(Step::OrderPlacement))
}

pub fn order_placement(
	_state: &OrderState,
	_decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	Ok(Transition::to(Step::CreditCheck))
}
