//! Step handlers of the revenue cycle.
//!
//! Each handler looks at the order and the decision for its step and plans a
//! [`Transition`]. Handlers never touch the order; the engine applies what they
//! return.

pub mod credit;
pub mod fulfillment;
pub mod inventory;
pub mod sales;
pub mod supply;

use crate::engine::Transition;
use crate::state::OrderState;
use crate::WorkflowError;
use revcycle_types::Decision;

/// Plans the transition out of one step.
pub type StepHandler = fn(&OrderState, Option<Decision>) -> Result<Transition, WorkflowError>;

/// Shipping charged when the order ships from finished goods stock.
pub const STOCK_SHIPPING_COST: u64 = 2_000;
/// Shipping charged when the order ships from production.
pub const PRODUCTION_SHIPPING_COST: u64 = 3_500;
/// Cost of manufacturing the order.
pub const PRODUCTION_COST: u64 = 35_000;
/// Cost of buying the raw materials.
pub const PROCUREMENT_COST: u64 = 40_000;

/// Days taken by the credit check.
pub const CREDIT_CHECK_DAYS: u64 = 1;
/// Days taken by the inventory check.
pub const INVENTORY_CHECK_DAYS: u64 = 1;
/// Days taken by the raw materials check.
pub const MATERIALS_CHECK_DAYS: u64 = 1;
/// Days the vendor needs to deliver raw materials.
pub const PROCUREMENT_DAYS: u64 = 10;
/// Days needed to manufacture the order.
pub const PRODUCTION_DAYS: u64 = 3;
/// Days needed to pick, pack and ship.
pub const SHIPPING_DAYS: u64 = 2;
