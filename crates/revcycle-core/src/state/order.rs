//! The order record mutated by the workflow engine.
//!
//! Construction checks the value invariant (`total_value = quantity *
//! unit_price`) and sets the delivery floor. Afterwards the record only changes
//! through the crate-private mutators below, each of which keeps
//! `expected_delivery >= current_date + DELIVERY_LEAD_DAYS`.

use crate::WorkflowError;
use chrono::{Days, NaiveDate};
use revcycle_types::{
	CostCategory, Costs, CreditStatus, Decision, DocumentKey, DocumentRecord, InventoryStatus,
	MaterialsStatus, Scenario, Step,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum number of days between the current date and expected delivery.
pub const DELIVERY_LEAD_DAYS: u64 = 5;

/// Progress of the single order handled by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderState {
	customer_name: String,
	product_name: String,
	shipping_address: String,
	quantity: u32,
	unit_price: u64,
	total_value: u64,
	credit_status: CreditStatus,
	inventory_status: InventoryStatus,
	materials_status: MaterialsStatus,
	start_date: NaiveDate,
	current_date: NaiveDate,
	expected_delivery: NaiveDate,
	costs: Costs,
	documents: BTreeMap<DocumentKey, DocumentRecord>,
	current_step: Step,
}

impl OrderState {
	/// Builds the initial state of an order from its scenario.
	pub fn new(scenario: &Scenario) -> Result<Self, WorkflowError> {
		if scenario.quantity == 0 {
			return Err(WorkflowError::InvariantViolation(
				"quantity must be greater than zero".into(),
			));
		}
		if scenario.unit_price == 0 {
			return Err(WorkflowError::InvariantViolation(
				"unit price must be greater than zero".into(),
			));
		}

		let total_value = u64::from(scenario.quantity)
			.checked_mul(scenario.unit_price)
			.ok_or_else(|| {
				WorkflowError::InvariantViolation(format!(
					"total value of {} x {} overflows",
					scenario.quantity, scenario.unit_price
				))
			})?;

		let expected_delivery = delivery_floor(scenario.start_date)?;

		Ok(Self {
			customer_name: scenario.customer_name.clone(),
			product_name: scenario.product_name.clone(),
			shipping_address: scenario.shipping_address.clone(),
			quantity: scenario.quantity,
			unit_price: scenario.unit_price,
			total_value,
			credit_status: CreditStatus::Unset,
			inventory_status: InventoryStatus::Unset,
			materials_status: MaterialsStatus::Unset,
			start_date: scenario.start_date,
			current_date: scenario.start_date,
			expected_delivery,
			costs: Costs::with_product_cost(total_value),
			documents: BTreeMap::new(),
			current_step: Step::FIRST,
		})
	}

	/// Re-checks the value and delivery invariants of a state that did not go
	/// through [`OrderState::new`], such as one read back from storage.
	pub(crate) fn validate(&self) -> Result<(), WorkflowError> {
		let expected_value = u64::from(self.quantity).checked_mul(self.unit_price);
		if self.quantity == 0 || self.unit_price == 0 || expected_value != Some(self.total_value) {
			return Err(WorkflowError::InvariantViolation(format!(
				"total value {} does not match {} x {}",
				self.total_value, self.quantity, self.unit_price
			)));
		}
		if self.expected_delivery < delivery_floor(self.current_date)? {
			return Err(WorkflowError::InvariantViolation(format!(
				"expected delivery {} is less than {} days after {}",
				self.expected_delivery, DELIVERY_LEAD_DAYS, self.current_date
			)));
		}
		Ok(())
	}

	pub fn customer_name(&self) -> &str {
		&self.customer_name
	}

	pub fn product_name(&self) -> &str {
		&self.product_name
	}

	pub fn shipping_address(&self) -> &str {
		&self.shipping_address
	}

	pub fn quantity(&self) -> u32 {
		self.quantity
	}

	pub fn unit_price(&self) -> u64 {
		self.unit_price
	}

	/// Quantity times unit price, fixed at construction.
	pub fn total_value(&self) -> u64 {
		self.total_value
	}

	pub fn credit_status(&self) -> CreditStatus {
		self.credit_status
	}

	pub fn inventory_status(&self) -> InventoryStatus {
		self.inventory_status
	}

	pub fn materials_status(&self) -> MaterialsStatus {
		self.materials_status
	}

	pub fn start_date(&self) -> NaiveDate {
		self.start_date
	}

	pub fn current_date(&self) -> NaiveDate {
		self.current_date
	}

	pub fn expected_delivery(&self) -> NaiveDate {
		self.expected_delivery
	}

	pub fn costs(&self) -> &Costs {
		&self.costs
	}

	/// Documents generated so far, keyed by document.
	pub fn documents(&self) -> &BTreeMap<DocumentKey, DocumentRecord> {
		&self.documents
	}

	pub fn document(&self, key: DocumentKey) -> Option<&DocumentRecord> {
		self.documents.get(&key)
	}

	pub fn current_step(&self) -> Step {
		self.current_step
	}

	/// Number of days elapsed since the order started.
	pub fn elapsed_days(&self) -> i64 {
		(self.current_date - self.start_date).num_days()
	}

	/// Records the status a decision sets.
	pub(crate) fn set_decision(&mut self, decision: Decision) {
		match decision {
			Decision::Credit(choice) => self.credit_status = choice.into(),
			Decision::Inventory(choice) => self.inventory_status = choice.into(),
			Decision::Materials(choice) => self.materials_status = choice.into(),
		}
	}

	/// Moves the current date forward and re-floors the expected delivery.
	pub(crate) fn advance_timeline(&mut self, days: u64) -> Result<(), WorkflowError> {
		let current_date = self
			.current_date
			.checked_add_days(Days::new(days))
			.ok_or_else(|| {
				WorkflowError::InvariantViolation(format!(
					"advancing {} by {} days leaves the calendar",
					self.current_date, days
				))
			})?;
		let floor = delivery_floor(current_date)?;

		self.current_date = current_date;
		self.expected_delivery = self.expected_delivery.max(floor);
		Ok(())
	}

	/// Assigns the amount of a cost category; repeated calls never accumulate.
	pub(crate) fn set_cost(&mut self, category: CostCategory, amount: u64) {
		self.costs.set(category, amount);
	}

	/// Stores a document unless one with the same key is already present.
	///
	/// Returns whether the record was stored.
	pub(crate) fn record_document(&mut self, record: DocumentRecord) -> bool {
		let key = record.key();
		if self.documents.contains_key(&key) {
			return false;
		}
		self.documents.insert(key, record);
		true
	}

	/// Starts a new run after a rejection: only the rejection notice survives.
	pub(crate) fn restart_run(&mut self) {
		self.documents
			.retain(|key, _| *key == DocumentKey::RejectionNotice);
	}

	pub(crate) fn set_step(&mut self, step: Step) {
		self.current_step = step;
	}
}

fn delivery_floor(date: NaiveDate) -> Result<NaiveDate, WorkflowError> {
	date.checked_add_days(Days::new(DELIVERY_LEAD_DAYS))
		.ok_or_else(|| {
			WorkflowError::InvariantViolation(format!(
				"delivery floor after {} leaves the calendar",
				date
			))
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use revcycle_types::{CreditDecision, DocumentField, RenderedDocument};

	fn start() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
	}

	fn record(key: DocumentKey) -> DocumentRecord {
		DocumentRecord::new(
			RenderedDocument::new(key, vec![DocumentField::new("Date", "January 06, 2025")]),
			start(),
		)
	}

	#[test]
	fn test_new_state_defaults() {
		let state = OrderState::new(&Scenario::bikeworld(start())).unwrap();

		assert_eq!(state.total_value(), 50_000);
		assert_eq!(state.costs().product_cost, 50_000);
		assert_eq!(state.costs().total(), 50_000);
		assert_eq!(state.current_step(), Step::Inquiry);
		assert_eq!(state.current_date(), start());
		assert_eq!(
			state.expected_delivery(),
			NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()
		);
		assert_eq!(state.credit_status(), CreditStatus::Unset);
		assert!(state.documents().is_empty());
	}

	#[test]
	fn test_new_rejects_broken_value_invariant() {
		let mut scenario = Scenario::bikeworld(start());
		scenario.quantity = 0;
		assert!(matches!(
			OrderState::new(&scenario),
			Err(WorkflowError::InvariantViolation(_))
		));

		let mut scenario = Scenario::bikeworld(start());
		scenario.unit_price = 0;
		assert!(OrderState::new(&scenario).is_err());

		let mut scenario = Scenario::bikeworld(start());
		scenario.quantity = u32::MAX;
		scenario.unit_price = u64::MAX;
		assert!(matches!(
			OrderState::new(&scenario),
			Err(WorkflowError::InvariantViolation(_))
		));
	}

	#[test]
	fn test_timeline_floor() {
		let mut state = OrderState::new(&Scenario::bikeworld(start())).unwrap();

		state.advance_timeline(1).unwrap();
		assert_eq!(state.elapsed_days(), 1);
		assert_eq!(
			state.expected_delivery(),
			state.current_date() + Days::new(DELIVERY_LEAD_DAYS)
		);

		state.advance_timeline(10).unwrap();
		assert_eq!(state.elapsed_days(), 11);
		assert_eq!(
			state.expected_delivery(),
			NaiveDate::from_ymd_opt(2025, 1, 22).unwrap()
		);
	}

	#[test]
	fn test_timeline_never_moves_delivery_back() {
		let mut state = OrderState::new(&Scenario::bikeworld(start())).unwrap();
		let before = state.expected_delivery();

		state.advance_timeline(0).unwrap();
		assert_eq!(state.expected_delivery(), before);
	}

	#[test]
	fn test_timeline_overflow_leaves_state_untouched() {
		let mut scenario = Scenario::bikeworld(NaiveDate::MAX - Days::new(7));
		scenario.quantity = 1;
		let mut state = OrderState::new(&scenario).unwrap();
		let before = state.clone();

		assert!(matches!(
			state.advance_timeline(10),
			Err(WorkflowError::InvariantViolation(_))
		));
		assert_eq!(state, before);
	}

	#[test]
	fn test_record_document_keeps_first() {
		let mut state = OrderState::new(&Scenario::bikeworld(start())).unwrap();

		assert!(state.record_document(record(DocumentKey::PurchaseOrder)));
		let mut later = record(DocumentKey::PurchaseOrder);
		later.issued_on = start() + Days::new(3);
		assert!(!state.record_document(later));
		assert_eq!(
			state.document(DocumentKey::PurchaseOrder).unwrap().issued_on,
			start()
		);
	}

	#[test]
	fn test_restart_run_keeps_rejection_notice() {
		let mut state = OrderState::new(&Scenario::bikeworld(start())).unwrap();
		state.record_document(record(DocumentKey::ResponseToInquiry));
		state.record_document(record(DocumentKey::CreditCheckReport));
		state.record_document(record(DocumentKey::RejectionNotice));
		state.set_decision(Decision::Credit(CreditDecision::Reject));

		state.restart_run();

		let keys: Vec<DocumentKey> = state.documents().keys().copied().collect();
		assert_eq!(keys, vec![DocumentKey::RejectionNotice]);
		assert_eq!(state.credit_status(), CreditStatus::Rejected);
	}

	#[test]
	fn test_serde_round_trip_keeps_documents() {
		let mut state = OrderState::new(&Scenario::bikeworld(start())).unwrap();
		state.record_document(record(DocumentKey::RejectionNotice));
		state.set_cost(CostCategory::Shipping, 2_000);

		let json = serde_json::to_string(&state).unwrap();
		let restored: OrderState = serde_json::from_str(&json).unwrap();
		assert_eq!(restored, state);
	}
}
