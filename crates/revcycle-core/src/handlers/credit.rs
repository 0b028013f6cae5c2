//! Credit check: the only step that can send the order back to the start.

use super::CREDIT_CHECK_DAYS;
use crate::documents;
use crate::engine::{Mutation, Transition};
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::{CreditDecision, Decision, DocumentRecord, Step};

/// Approve moves on to the inventory check after one day. Reject restarts the
/// run at the inquiry with a rejection notice; the date does not move.
pub fn credit_check(
	state: &OrderState,
	decision: Option<Decision>,
) -> Result<Transition, WorkflowError> {
	let choice = match decision {
		Some(Decision::Credit(choice)) => choice,
		Some(other) => {
			return Err(WorkflowError::InvalidDecision {
				step: Step::CreditCheck,
				reason: format!("'{}' is not a credit decision", other),
			})
		},
		None => return Err(WorkflowError::missing_decision(Step::CreditCheck)),
	};

	let transition = match choice {
		CreditDecision::Approve => Transition::to(Step::Inventory)
			.with(Mutation::Decide(Decision::Credit(choice)))
			.with(Mutation::AdvanceTimeline(CREDIT_CHECK_DAYS)),
		CreditDecision::Reject => {
			let notice = DocumentRecord::new(
				documents::rejection_notice(state),
				state.current_date(),
			);
			Transition::to(Step::Inquiry)
				.with(Mutation::Decide(Decision::Credit(choice)))
				.with(Mutation::RestartRun)
				.with(Mutation::RecordDocument(notice))
		},
	};
	Ok(transition)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use revcycle_types::{DocumentKey, InventoryDecision, Scenario};

	fn state() -> OrderState {
		OrderState::new(&Scenario::bikeworld(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()))
			.unwrap()
	}

	#[test]
	fn test_approve_takes_one_day() {
		let transition =
			credit_check(&state(), Some(Decision::Credit(CreditDecision::Approve))).unwrap();

		assert_eq!(transition.next, Step::Inventory);
		assert!(transition
			.mutations
			.contains(&Mutation::AdvanceTimeline(CREDIT_CHECK_DAYS)));
	}

	#[test]
	fn test_reject_plans_restart_without_timeline() {
		let transition =
			credit_check(&state(), Some(Decision::Credit(CreditDecision::Reject))).unwrap();

		assert_eq!(transition.next, Step::Inquiry);
		assert!(transition.mutations.contains(&Mutation::RestartRun));
		assert!(!transition
			.mutations
			.iter()
			.any(|m| matches!(m, Mutation::AdvanceTimeline(_))));

		let notice = transition
			.mutations
			.iter()
			.find_map(|m| match m {
				Mutation::RecordDocument(record) => Some(record),
				_ => None,
			})
			.unwrap();
		assert_eq!(notice.key(), DocumentKey::RejectionNotice);
		assert_eq!(notice.field("Reason"), Some("Credit Check Failed"));
	}

	#[test]
	fn test_wrong_or_missing_decision() {
		let err = credit_check(
			&state(),
			Some(Decision::Inventory(InventoryDecision::InStock)),
		)
		.unwrap_err();
		assert!(matches!(err, WorkflowError::InvalidDecision { .. }));

		let err = credit_check(&state(), None).unwrap_err();
		assert!(err.to_string().contains("Approve, Reject"));
	}
}
