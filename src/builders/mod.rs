//! Builders
//!
//! Fluent builders for configuration.

pub mod config;

pub use config::ProviderConfigBuilder;
