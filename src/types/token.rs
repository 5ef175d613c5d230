//! Token Types
//!
//! Classification of inbound bearer tokens.

use serde::{Deserialize, Serialize};

/// Literal prefix carried by refresh tokens that this service tracks internally.
pub const REFRESH_TOKEN_PREFIX: &str = "st_rt_";

/// Handling path for a bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Opaque access token, revoked directly in the session store.
    AccessToken,
    /// Internally tracked refresh token, revoked through the provider first.
    RefreshToken,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a token by its literal prefix.
///
/// Total: every string, including the empty one, maps to exactly one kind.
pub fn classify(token: &str) -> TokenKind {
    if token.starts_with(REFRESH_TOKEN_PREFIX) {
        TokenKind::RefreshToken
    } else {
        TokenKind::AccessToken
    }
}
