//! Revocation Error Types
//!
//! Error hierarchy for the revocation flow. Every failure collapses into one of
//! two request-level kinds: bad client input, or an internal fault.

use std::time::Duration;
use thiserror::Error;

/// Root error type for token revocation.
#[derive(Error, Debug)]
pub enum RevocationError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Request-level error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client sent something unusable. Nothing was sent to the provider.
    InputInvalid,
    /// Any other failure. Surfaced once, never retried.
    InternalError,
}

impl RevocationError {
    /// Classify the error for the response layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::InputInvalid,
            _ => ErrorKind::InternalError,
        }
    }

    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Input(_) => "REVOKE_INPUT",
            Self::Configuration(_) => "REVOKE_CONFIG",
            Self::Network(_) => "REVOKE_NETWORK",
            Self::Protocol(_) => "REVOKE_PROTOCOL",
            Self::Storage(_) => "REVOKE_STORAGE",
            Self::Validation(_) => "REVOKE_VALIDATION",
        }
    }

    /// Check if the error was caused by client input.
    pub fn is_input_error(&self) -> bool {
        self.kind() == ErrorKind::InputInvalid
    }
}

/// Client input error.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Field {field} is missing in JSON input")]
    MissingField { field: String },

    #[error("Field {field} is invalid: {message}")]
    InvalidField { field: String, message: String },

    #[error("Malformed authorization header: {message}")]
    MalformedAuthorizationHeader { message: String },
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Environment error: {message}")]
    Environment { message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Protocol/response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// Session store error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage query failed: {message}")]
    QueryFailed { message: String },

    #[error("Storage transaction failed: {message}")]
    TransactionFailed { message: String },

    #[error("Tenant or app not found: {app_id}")]
    TenantOrAppNotFound { app_id: String },

    #[error("No internal token mapped for the supplied refresh token")]
    MappingNotFound,
}

/// Introspection payload validation error.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Introspection payload does not match stored state: {message}")]
    PayloadMismatch { message: String },

    #[error("Unsupported JWT signing algorithm: {algorithm}")]
    UnsupportedSigningAlgorithm { algorithm: String },

    #[error("Feature not enabled: {feature}")]
    FeatureNotEnabled { feature: String },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

/// Result type for revocation operations.
pub type RevocationResult<T> = Result<T, RevocationError>;
