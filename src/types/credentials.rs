//! Client Credential Types

use secrecy::{ExposeSecret, SecretString};

/// Client identity presented on a revoke request.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Client identifier.
    pub client_id: String,
    /// Client secret. Absent for public clients.
    pub client_secret: Option<SecretString>,
}

impl ClientCredentials {
    /// Create credentials for a confidential client.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Some(SecretString::new(client_secret.into())),
        }
    }

    /// Create credentials for a public client.
    pub fn public(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
        }
    }

    /// Borrow the secret, if any.
    pub fn secret(&self) -> Option<&str> {
        self.client_secret.as_ref().map(|s| s.expose_secret().as_str())
    }

    /// Form fields sent to the provider's revoke endpoint.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("client_id", self.client_id.clone())];
        if let Some(secret) = self.secret() {
            fields.push(("client_secret", secret.to_string()));
        }
        fields
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
