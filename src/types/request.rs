//! Inbound Request Types

use serde::{Deserialize, Serialize};

use crate::error::{InputError, RevocationError};

/// Body of an inbound revoke request.
#[derive(Clone, Default, Deserialize)]
pub struct RevokeTokenRequest {
    /// Bearer token to revoke.
    pub token: String,
    /// `Basic <base64(id:secret)>` or the bare base64 payload.
    #[serde(default, rename = "authorizationHeader")]
    pub authorization_header: Option<String>,
    /// Client id when no header is supplied.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Client secret when no header is supplied. Omitted for public clients.
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl RevokeTokenRequest {
    /// Create a request for a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Set authorization header.
    pub fn authorization_header(mut self, header: impl Into<String>) -> Self {
        self.authorization_header = Some(header.into());
        self
    }

    /// Set client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Parse and validate a JSON body.
    ///
    /// `token` must be a string; the optional fields must be strings when present.
    pub fn from_json(body: &serde_json::Value) -> Result<Self, RevocationError> {
        let object = body.as_object().ok_or_else(|| InputError::InvalidField {
            field: "body".to_string(),
            message: "expected a JSON object".to_string(),
        })?;

        let token = required_string(object, "token")?;
        let authorization_header = optional_string(object, "authorizationHeader")?;
        let client_id = optional_string(object, "client_id")?;
        let client_secret = optional_string(object, "client_secret")?;

        Ok(Self {
            token,
            authorization_header,
            client_id,
            client_secret,
        })
    }
}

impl std::fmt::Debug for RevokeTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevokeTokenRequest")
            .field("token", &"[REDACTED]")
            .field(
                "authorization_header",
                &self.authorization_header.as_ref().map(|_| "[REDACTED]"),
            )
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn required_string(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<String, RevocationError> {
    optional_string(object, field)?.ok_or_else(|| {
        InputError::MissingField {
            field: field.to_string(),
        }
        .into()
    })
}

fn optional_string(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
) -> Result<Option<String>, RevocationError> {
    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(InputError::InvalidField {
            field: field.to_string(),
            message: "expected a string".to_string(),
        }
        .into()),
    }
}

/// Success body: `{"status":"OK"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeTokenResponse {
    pub status: String,
}

impl RevokeTokenResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full() {
        let request = RevokeTokenRequest::from_json(&json!({
            "token": "st_rt_abc",
            "authorizationHeader": "Basic YWJjOnNlY3JldDEyMw==",
            "client_id": "abc",
            "client_secret": "secret123"
        }))
        .unwrap();

        assert_eq!(request.token, "st_rt_abc");
        assert_eq!(
            request.authorization_header.as_deref(),
            Some("Basic YWJjOnNlY3JldDEyMw==")
        );
        assert_eq!(request.client_id.as_deref(), Some("abc"));
        assert_eq!(request.client_secret.as_deref(), Some("secret123"));
    }

    #[test]
    fn test_from_json_missing_token() {
        let err = RevokeTokenRequest::from_json(&json!({"client_id": "abc"})).unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_from_json_wrong_type() {
        let err = RevokeTokenRequest::from_json(&json!({"token": 42})).unwrap_err();
        assert!(matches!(
            err,
            RevocationError::Input(InputError::InvalidField { .. })
        ));

        let err = RevokeTokenRequest::from_json(&json!(["token"])).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let request = RevokeTokenRequest::from_json(&json!({
            "token": "t",
            "authorizationHeader": null
        }))
        .unwrap();
        assert!(request.authorization_header.is_none());
    }

    #[test]
    fn test_ok_response_shape() {
        assert_eq!(
            serde_json::to_value(RevokeTokenResponse::ok()).unwrap(),
            json!({"status": "OK"})
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let request = RevokeTokenRequest::new("st_rt_secret_value").client_secret("pw");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("st_rt_secret_value"));
        assert!(!debug.contains("pw"));
    }
}
