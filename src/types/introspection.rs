//! Introspection Types
//!
//! Wire payload of the provider's introspection endpoint and the reduced
//! result the revocation flow works with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ProtocolError, RevocationError};

/// Introspection payload as returned by the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    /// Whether the token is active.
    pub active: bool,
    /// Client that the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Grant (session) identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    /// Expiration timestamp (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued-at timestamp (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Subject identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Token use as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,
    /// Additional claims.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl IntrospectionResponse {
    /// Inactive payload with no claims.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Parse from the provider's JSON body.
    pub fn from_json(value: serde_json::Value) -> Result<Self, RevocationError> {
        serde_json::from_value(value).map_err(|e| {
            RevocationError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }
}

/// What the revocation flow keeps from introspection.
///
/// `grant_id` and `expiry` are only populated when `active` is true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntrospectionResult {
    pub active: bool,
    pub grant_id: Option<String>,
    pub expiry: Option<i64>,
    pub client_id: Option<String>,
}

impl IntrospectionResult {
    /// Reduce a validated payload.
    ///
    /// An active payload must carry `gid`; an inactive one never yields a
    /// grant, whatever claims it contains.
    pub fn from_response(response: &IntrospectionResponse) -> Result<Self, RevocationError> {
        if !response.active {
            return Ok(Self {
                active: false,
                grant_id: None,
                expiry: None,
                client_id: response.client_id.clone(),
            });
        }

        let grant_id = response.gid.clone().ok_or_else(|| {
            RevocationError::Protocol(ProtocolError::MissingField {
                field: "gid".to_string(),
            })
        })?;

        Ok(Self {
            active: true,
            grant_id: Some(grant_id),
            expiry: response.exp,
            client_id: response.client_id.clone(),
        })
    }
}
