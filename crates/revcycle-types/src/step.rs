//! Step identifiers for the revenue cycle.
//!
//! Steps are static metadata: an ordered identifier, a display name, the role
//! the learner plays and the input that starts the step. Behaviour attached to
//! a step lives in the workflow engine's transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an integer or string does not name one of the ten steps.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown step: {0}")]
pub struct UnknownStep(pub String);

/// One of the ten stages of the order-to-cash workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
	/// 1. The customer asks about availability, price and delivery.
	Inquiry,
	/// 2. The customer sends a purchase order.
	OrderPlacement,
	/// 3. The credit manager approves or rejects the order.
	CreditCheck,
	/// 4. Finished goods inventory is checked.
	Inventory,
	/// 5. A back order is raised and raw materials are checked.
	BackOrder,
	/// 6. Raw materials are bought from a vendor.
	Procurement,
	/// 7. The goods are manufactured.
	Production,
	/// 8. The order is picked, packed and shipped.
	Shipping,
	/// 9. The customer is invoiced.
	Billing,
	/// 10. Payment is collected. Terminal.
	Collections,
}

impl Step {
	/// The step every order starts at.
	pub const FIRST: Step = Step::Inquiry;
	/// The terminal step.
	pub const LAST: Step = Step::Collections;

	/// Returns all steps in workflow order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Inquiry,
			Self::OrderPlacement,
			Self::CreditCheck,
			Self::Inventory,
			Self::BackOrder,
			Self::Procurement,
			Self::Production,
			Self::Shipping,
			Self::Billing,
			Self::Collections,
		]
		.into_iter()
	}

	/// Returns the 1-based identifier of the step.
	pub fn id(&self) -> u8 {
		match self {
			Self::Inquiry => 1,
			Self::OrderPlacement => 2,
			Self::CreditCheck => 3,
			Self::Inventory => 4,
			Self::BackOrder => 5,
			Self::Procurement => 6,
			Self::Production => 7,
			Self::Shipping => 8,
			Self::Billing => 9,
			Self::Collections => 10,
		}
	}

	/// Looks a step up by its 1-based identifier.
	pub fn from_id(id: u8) -> Option<Self> {
		Self::all().find(|step| step.id() == id)
	}

	/// Human-readable step name.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Inquiry => "Customer Inquiry & Response",
			Self::OrderPlacement => "Order Placement",
			Self::CreditCheck => "Credit Check & Approval",
			Self::Inventory => "Inventory Management",
			Self::BackOrder => "Back Order Processing",
			Self::Procurement => "Procurement",
			Self::Production => "Production",
			Self::Shipping => "Shipping Process",
			Self::Billing => "Billing Process",
			Self::Collections => "Cash Collections",
		}
	}

	/// The role the learner plays at this step.
	pub fn role(&self) -> &'static str {
		match self {
			Self::Inquiry | Self::OrderPlacement => "Sales Representative",
			Self::CreditCheck => "Credit Manager",
			Self::Inventory => "Inventory Manager",
			Self::BackOrder | Self::Production => "Production Manager",
			Self::Procurement => "Procurement Manager",
			Self::Shipping => "Warehouse Operations",
			Self::Billing => "Billing Clerk",
			Self::Collections => "Accounts Receivable",
		}
	}

	/// The input that triggers the step.
	pub fn scenario_input(&self) -> &'static str {
		match self {
			Self::Inquiry => {
				"Customer submits an inquiry about product availability, pricing, \
				 and delivery times."
			},
			Self::OrderPlacement => {
				"Customer submits a Purchase Order (PO) specifying product details \
				 and requirements."
			},
			Self::CreditCheck => "The system retrieves customer's credit information for review.",
			Self::Inventory => "The system checks Finished Goods (FG) inventory.",
			Self::BackOrder => "Back Order is created. Production must be scheduled.",
			Self::Procurement => "Purchase Requisition (PR) is issued to Procurement.",
			Self::Production => "Raw Materials are available, production can begin.",
			Self::Shipping => "Shipping process initiated for the order.",
			Self::Billing => "Shipping documents received, ready for invoice generation.",
			Self::Collections => "Awaiting customer payment processing.",
		}
	}

	/// Whether `advance` needs a decision at this step.
	pub fn requires_decision(&self) -> bool {
		matches!(self, Self::CreditCheck | Self::Inventory | Self::BackOrder)
	}

	/// Whether this is the terminal step.
	pub fn is_terminal(&self) -> bool {
		*self == Self::LAST
	}

	/// The default successor, capped at the terminal step.
	pub fn next(&self) -> Self {
		Self::from_id(self.id() + 1).unwrap_or(Self::LAST)
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}. {}", self.id(), self.name())
	}
}

impl From<Step> for u8 {
	fn from(step: Step) -> Self {
		step.id()
	}
}

impl TryFrom<u8> for Step {
	type Error = UnknownStep;

	fn try_from(id: u8) -> Result<Self, Self::Error> {
		Self::from_id(id).ok_or_else(|| UnknownStep(id.to_string()))
	}
}

impl FromStr for Step {
	type Err = UnknownStep;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim()
			.parse::<u8>()
			.ok()
			.and_then(Self::from_id)
			.ok_or_else(|| UnknownStep(s.to_string()))
	}
}
