//! Revocation Types
//!
//! Core type definitions for the revocation flow.

pub mod config;
pub mod context;
pub mod credentials;
pub mod introspection;
pub mod outcome;
pub mod request;
pub mod token;

pub use config::*;
pub use context::*;
pub use credentials::*;
pub use introspection::*;
pub use outcome::*;
pub use request::*;
pub use token::*;
