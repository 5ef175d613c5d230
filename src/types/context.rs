//! Request Context
//!
//! Per-request identity threaded explicitly through every call.

/// Identifies the application a request belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppIdentifier {
    /// Connection URI domain; empty for the default domain.
    pub connection_uri_domain: String,
    /// Application identifier.
    pub app_id: String,
}

impl AppIdentifier {
    pub fn new(connection_uri_domain: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            connection_uri_domain: connection_uri_domain.into(),
            app_id: app_id.into(),
        }
    }
}

impl Default for AppIdentifier {
    fn default() -> Self {
        Self::new("", "public")
    }
}

/// Request-scoped context.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// Resolved application.
    pub app: AppIdentifier,
    /// Correlation id, if the caller has one.
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Create a context for an application.
    pub fn new(app: AppIdentifier) -> Self {
        Self {
            app,
            request_id: None,
        }
    }

    /// Set request ID.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
