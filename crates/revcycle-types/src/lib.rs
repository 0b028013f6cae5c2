//! Common types for the revenue cycle simulator.
//!
//! This crate defines the vocabulary shared by every other crate: the ten
//! workflow steps, the decisions a learner can make, order costs, generated
//! documents, storage keys and the configuration schema helpers used by
//! pluggable backends.

/// API types for HTTP endpoints and error responses.
pub mod api;
/// Decisions and the order statuses they set.
pub mod decision;
/// Generated business documents.
pub mod document;
/// Scenario and cost types.
pub mod order;
/// Registry trait for pluggable implementations.
pub mod registry;
/// Workflow step identifiers and metadata.
pub mod step;
/// Storage namespaces.
pub mod storage;
/// Formatting helpers.
pub mod utils;
/// Configuration validation for backend settings.
pub mod validation;

pub use api::*;
pub use decision::*;
pub use document::*;
pub use order::*;
pub use registry::*;
pub use step::*;
pub use storage::*;
pub use utils::{document_number, format_currency, format_date, truncate_id};
pub use validation::*;
