//! Logging
//!
//! Structured logging for revocation requests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::RequestContext;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Revocation log context.
///
/// Never carries token values or client secrets.
#[derive(Debug, Clone, Default)]
pub struct RevocationLogContext {
    /// Application id.
    pub app_id: Option<String>,
    /// Operation name.
    pub operation: Option<String>,
    /// Client ID.
    pub client_id: Option<String>,
    /// Request ID for correlation.
    pub request_id: Option<String>,
    /// Additional context.
    pub extra: BTreeMap<String, String>,
}

impl RevocationLogContext {
    /// Create new log context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a context from the request.
    pub fn from_request(ctx: &RequestContext) -> Self {
        Self {
            app_id: Some(ctx.app.app_id.clone()),
            request_id: ctx.request_id.clone(),
            ..Self::default()
        }
    }

    /// Set operation.
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Add extra context.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    fn fields(&self) -> String {
        let mut parts = Vec::new();
        if let Some(app_id) = &self.app_id {
            parts.push(format!("app_id={}", app_id));
        }
        if let Some(operation) = &self.operation {
            parts.push(format!("operation={}", operation));
        }
        if let Some(client_id) = &self.client_id {
            parts.push(format!("client_id={}", client_id));
        }
        if let Some(request_id) = &self.request_id {
            parts.push(format!("request_id={}", request_id));
        }
        parts.extend(self.extras());
        parts.join(" ")
    }

    fn extras(&self) -> Option<String> {
        if self.extra.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .extra
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        Some(parts.join(" "))
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    fn trace(&self, message: &str, context: &RevocationLogContext);

    fn debug(&self, message: &str, context: &RevocationLogContext);

    fn info(&self, message: &str, context: &RevocationLogContext);

    fn warn(&self, message: &str, context: &RevocationLogContext);

    fn error(&self, message: &str, context: &RevocationLogContext);

    /// Check if a log level is enabled.
    fn is_enabled(&self, level: LogLevel) -> bool;
}

/// No-op logger implementation.
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn trace(&self, _message: &str, _context: &RevocationLogContext) {}
    fn debug(&self, _message: &str, _context: &RevocationLogContext) {}
    fn info(&self, _message: &str, _context: &RevocationLogContext) {}
    fn warn(&self, _message: &str, _context: &RevocationLogContext) {}
    fn error(&self, _message: &str, _context: &RevocationLogContext) {}
    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Log entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: RevocationLogContext,
    pub timestamp: u64,
}

/// In-memory logger for testing.
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl InMemoryLogger {
    /// Create new in-memory logger.
    pub fn new() -> Self {
        Self::with_level(LogLevel::Trace)
    }

    /// Create in-memory logger with minimum level.
    pub fn with_level(min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    /// Get all log entries.
    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Get entries by level.
    pub fn get_entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Whether any entry's message or context contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.message.contains(needle) || e.context.fields().contains(needle))
    }

    fn log(&self, level: LogLevel, message: &str, context: &RevocationLogContext) {
        if level >= self.min_level {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64;

            self.entries.lock().unwrap().push(LogEntry {
                level,
                message: message.to_string(),
                context: context.clone(),
                timestamp: now,
            });
        }
    }
}

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for InMemoryLogger {
    fn trace(&self, message: &str, context: &RevocationLogContext) {
        self.log(LogLevel::Trace, message, context);
    }

    fn debug(&self, message: &str, context: &RevocationLogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    fn info(&self, message: &str, context: &RevocationLogContext) {
        self.log(LogLevel::Info, message, context);
    }

    fn warn(&self, message: &str, context: &RevocationLogContext) {
        self.log(LogLevel::Warn, message, context);
    }

    fn error(&self, message: &str, context: &RevocationLogContext) {
        self.log(LogLevel::Error, message, context);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

/// Logger that forwards to the `tracing` subscriber installed by the host.
#[derive(Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! emit {
    ($level:ident, $message:expr, $context:expr) => {{
        let context = $context;
        let extra = context.extras();
        tracing::$level!(
            target: "oauth2_revocation",
            app_id = context.app_id.as_deref(),
            operation = context.operation.as_deref(),
            client_id = context.client_id.as_deref(),
            request_id = context.request_id.as_deref(),
            extra = extra.as_deref(),
            "{}",
            $message
        );
    }};
}

impl Logger for TracingLogger {
    fn trace(&self, message: &str, context: &RevocationLogContext) {
        emit!(trace, message, context);
    }

    fn debug(&self, message: &str, context: &RevocationLogContext) {
        emit!(debug, message, context);
    }

    fn info(&self, message: &str, context: &RevocationLogContext) {
        emit!(info, message, context);
    }

    fn warn(&self, message: &str, context: &RevocationLogContext) {
        emit!(warn, message, context);
    }

    fn error(&self, message: &str, context: &RevocationLogContext) {
        emit!(error, message, context);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Trace => tracing::enabled!(tracing::Level::TRACE),
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
            LogLevel::Error => tracing::enabled!(tracing::Level::ERROR),
        }
    }
}
