//! Storage-related types for the simulator.

/// Storage namespaces used by the simulator.
///
/// Replaces string literals in storage calls with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Saved session snapshots.
	Sessions,
}

impl StorageKey {
	/// Returns the namespace string for the key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Sessions => "sessions",
		}
	}
}
