//! State held for the order in flight.
//!
//! [`OrderState`] is readable by everyone and writable only from inside this
//! crate, so every change goes through the workflow engine.

pub mod order;

pub use order::{OrderState, DELIVERY_LEAD_DAYS};
