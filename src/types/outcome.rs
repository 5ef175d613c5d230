//! Revocation Outcomes

use serde::Serialize;

use crate::error::{ErrorKind, RevocationResult};

/// Error response produced by the provider, relayed verbatim by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderFailure {
    /// HTTP status returned by the provider.
    pub status: u16,
    /// Raw response body returned by the provider.
    pub body: String,
}

impl ProviderFailure {
    /// Parse the body as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Non-error result of a revoke request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// Token revoked; respond with `{"status":"OK"}`.
    Revoked,
    /// The provider refused the revoke call. Its response is the terminal
    /// response; nothing else is written for this request.
    ProviderRejected(ProviderFailure),
}

impl RevocationOutcome {
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

/// Terminal state of a revoke request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationStatus {
    Revoked,
    ProviderRejected,
    InputInvalid,
    InternalError,
}

impl RevocationStatus {
    /// Terminal state of a finished request.
    pub fn of(result: &RevocationResult<RevocationOutcome>) -> Self {
        match result {
            Ok(RevocationOutcome::Revoked) => Self::Revoked,
            Ok(RevocationOutcome::ProviderRejected(_)) => Self::ProviderRejected,
            Err(e) => match e.kind() {
                ErrorKind::InputInvalid => Self::InputInvalid,
                ErrorKind::InternalError => Self::InternalError,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revoked => "revoked",
            Self::ProviderRejected => "provider_rejected",
            Self::InputInvalid => "input_invalid",
            Self::InternalError => "internal_error",
        }
    }
}
