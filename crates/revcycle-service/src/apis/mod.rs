//! API implementations for the simulator's HTTP endpoints.

pub mod session;
