//! Utility functions shared across the simulator crates.

pub mod formatting;

pub use formatting::{document_number, format_currency, format_date, truncate_id};
