//! Revocation Flows
//!
//! Orchestration of a revoke request across the provider and the session
//! store.

pub mod revoke;

pub use revoke::RevokeTokenFlow;
