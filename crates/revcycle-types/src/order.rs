//! Order scenario and cost types.
//!
//! A [`Scenario`] fixes who is buying what at which price. [`Costs`] holds the
//! amounts accrued against the order, one slot per [`CostCategory`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed inputs of a simulated order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
	/// The buying customer.
	pub customer_name: String,
	/// The product being ordered.
	pub product_name: String,
	/// Number of units ordered.
	pub quantity: u32,
	/// Price per unit in whole dollars.
	pub unit_price: u64,
	/// Simulated date the order starts on.
	pub start_date: NaiveDate,
	/// Delivery address printed on order documents.
	pub shipping_address: String,
}

impl Scenario {
	/// The classroom scenario: 100 black mountain bikes for BikeWorld Wholesale.
	pub fn bikeworld(start_date: NaiveDate) -> Self {
		Self {
			customer_name: "BikeWorld Wholesale".to_string(),
			product_name: "Mountain Bike (Black)".to_string(),
			quantity: 100,
			unit_price: 500,
			start_date,
			shipping_address: "BikeWorld Wholesale, 123 Bike Street, NY".to_string(),
		}
	}
}

/// Category of a cost accrued against the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostCategory {
	ProductCost,
	Shipping,
	Procurement,
	Production,
}

impl CostCategory {
	/// Returns all categories in display order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::ProductCost,
			Self::Shipping,
			Self::Procurement,
			Self::Production,
		]
		.into_iter()
	}

	/// Display label for cost summaries.
	pub fn label(&self) -> &'static str {
		match self {
			Self::ProductCost => "Product Cost",
			Self::Shipping => "Shipping",
			Self::Procurement => "Procurement",
			Self::Production => "Production",
		}
	}
}

impl fmt::Display for CostCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Amounts accrued against an order, in whole dollars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
	pub product_cost: u64,
	pub shipping: u64,
	pub procurement: u64,
	pub production: u64,
}

impl Costs {
	/// Costs of a new order: only the product cost is known.
	pub fn with_product_cost(product_cost: u64) -> Self {
		Self {
			product_cost,
			..Self::default()
		}
	}

	/// Amount currently held for `category`.
	pub fn get(&self, category: CostCategory) -> u64 {
		match category {
			CostCategory::ProductCost => self.product_cost,
			CostCategory::Shipping => self.shipping,
			CostCategory::Procurement => self.procurement,
			CostCategory::Production => self.production,
		}
	}

	/// Replaces the amount held for `category`.
	pub fn set(&mut self, category: CostCategory, amount: u64) {
		let slot = match category {
			CostCategory::ProductCost => &mut self.product_cost,
			CostCategory::Shipping => &mut self.shipping,
			CostCategory::Procurement => &mut self.procurement,
			CostCategory::Production => &mut self.production,
		};
		*slot = amount;
	}

	/// Iterates `(category, amount)` pairs in display order.
	pub fn iter(&self) -> impl Iterator<Item = (CostCategory, u64)> + '_ {
		CostCategory::all().map(move |c| (c, self.get(c)))
	}

	/// Sum of all categories.
	pub fn total(&self) -> u64 {
		self.iter().map(|(_, amount)| amount).sum()
	}
}
