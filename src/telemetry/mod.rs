//! Telemetry
//!
//! Observability components for revocation requests.
//!
//! - **Metrics**: outcome, provider-call and error counters
//! - **Logging**: structured logging with request context

pub mod logging;
pub mod metrics;

// Metrics
pub use metrics::{InMemoryMetrics, MetricEntry, MetricLabels, NoOpMetrics, RevocationMetrics};

// Logging
pub use logging::{
    InMemoryLogger, LogEntry, LogLevel, Logger, NoOpLogger,
    RevocationLogContext, TracingLogger,
};
