//! Decisions supplied by the learner and the statuses they set.
//!
//! Only three steps take a decision: credit check, inventory check and the
//! raw-material check of back order processing. Each has its own two-valued
//! enum so a decision can never carry a value foreign to its step.

use crate::Step;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while turning user input into a [`Decision`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
	/// The step does not take a decision at all.
	#[error("Step {0} does not take a decision")]
	NotRequired(Step),
	/// The label is not one of the step's options.
	#[error("'{label}' is not a valid choice for step {step}; expected one of: {expected}")]
	UnknownOption {
		step: Step,
		label: String,
		expected: String,
	},
}

/// Outcome of the credit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditDecision {
	Approve,
	Reject,
}

/// Outcome of the finished goods inventory check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryDecision {
	InStock,
	OutOfStock,
}

/// Outcome of the raw materials check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialsDecision {
	Available,
	NotAvailable,
}

/// A user-supplied choice for one of the decision-bearing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "choice", rename_all = "camelCase")]
pub enum Decision {
	Credit(CreditDecision),
	Inventory(InventoryDecision),
	Materials(MaterialsDecision),
}

impl Decision {
	/// The step this decision belongs to.
	pub fn step(&self) -> Step {
		match self {
			Decision::Credit(_) => Step::CreditCheck,
			Decision::Inventory(_) => Step::Inventory,
			Decision::Materials(_) => Step::BackOrder,
		}
	}

	/// Display label, as offered to the learner.
	pub fn label(&self) -> &'static str {
		match self {
			Decision::Credit(CreditDecision::Approve) => "Approve",
			Decision::Credit(CreditDecision::Reject) => "Reject",
			Decision::Inventory(InventoryDecision::InStock) => "In Stock",
			Decision::Inventory(InventoryDecision::OutOfStock) => "Out of Stock",
			Decision::Materials(MaterialsDecision::Available) => "Available",
			Decision::Materials(MaterialsDecision::NotAvailable) => "Not Available",
		}
	}

	/// The decisions available at `step`, empty for steps that take none.
	pub fn options(step: Step) -> &'static [Decision] {
		match step {
			Step::CreditCheck => &[
				Decision::Credit(CreditDecision::Approve),
				Decision::Credit(CreditDecision::Reject),
			],
			Step::Inventory => &[
				Decision::Inventory(InventoryDecision::InStock),
				Decision::Inventory(InventoryDecision::OutOfStock),
			],
			Step::BackOrder => &[
				Decision::Materials(MaterialsDecision::Available),
				Decision::Materials(MaterialsDecision::NotAvailable),
			],
			_ => &[],
		}
	}

	/// Parses a free-form label for the given step.
	///
	/// Matching ignores case, whitespace, underscores and hyphens, so
	/// "Out of Stock", "out_of_stock" and "OutOfStock" are equivalent. A
	/// 1-based option index ("1", "2") is accepted as well.
	pub fn parse_for(step: Step, label: &str) -> Result<Decision, DecisionError> {
		let options = Decision::options(step);
		if options.is_empty() {
			return Err(DecisionError::NotRequired(step));
		}

		let wanted = normalize(label);
		if let Ok(index) = wanted.parse::<usize>() {
			if let Some(decision) = index.checked_sub(1).and_then(|i| options.get(i)) {
				return Ok(*decision);
			}
		}

		options
			.iter()
			.find(|option| normalize(option.label()) == wanted)
			.copied()
			.ok_or_else(|| DecisionError::UnknownOption {
				step,
				label: label.to_string(),
				expected: options
					.iter()
					.map(|o| o.label())
					.collect::<Vec<_>>()
					.join(", "),
			})
	}
}

impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

fn normalize(label: &str) -> String {
	label
		.chars()
		.filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
		.flat_map(char::to_lowercase)
		.collect()
}

/// Result of the credit check recorded on the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CreditStatus {
	#[default]
	Unset,
	Approved,
	Rejected,
}

/// Result of the inventory check recorded on the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventoryStatus {
	#[default]
	Unset,
	InStock,
	OutOfStock,
}

/// Result of the raw materials check recorded on the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaterialsStatus {
	#[default]
	Unset,
	Available,
	NotAvailable,
}

impl From<CreditDecision> for CreditStatus {
	fn from(decision: CreditDecision) -> Self {
		match decision {
			CreditDecision::Approve => CreditStatus::Approved,
			CreditDecision::Reject => CreditStatus::Rejected,
		}
	}
}

impl From<InventoryDecision> for InventoryStatus {
	fn from(decision: InventoryDecision) -> Self {
		match decision {
			InventoryDecision::InStock => InventoryStatus::InStock,
			InventoryDecision::OutOfStock => InventoryStatus::OutOfStock,
		}
	}
}

impl From<MaterialsDecision> for MaterialsStatus {
	fn from(decision: MaterialsDecision) -> Self {
		match decision {
			MaterialsDecision::Available => MaterialsStatus::Available,
			MaterialsDecision::NotAvailable => MaterialsStatus::NotAvailable,
		}
	}
}
