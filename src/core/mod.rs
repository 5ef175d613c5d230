//! Core Components
//!
//! Transport to the external provider.

pub mod proxy;
pub mod transport;

pub use proxy::*;
pub use transport::*;
