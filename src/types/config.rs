//! Configuration Types
//!
//! Where the external authorization provider lives and how to talk to it.

use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, RevocationError};

/// Provider path for token introspection (administrative channel).
pub const INTROSPECT_PATH: &str = "/admin/oauth2/introspect";

/// Provider path for token revocation (public channel).
pub const REVOKE_PATH: &str = "/oauth2/revoke";

/// Default configuration values.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1048576;

/// Environment variables read by [`ProviderConfig::from_env`].
pub const ENV_PUBLIC_SERVICE_URL: &str = "OAUTH_PROVIDER_PUBLIC_SERVICE_URL";
pub const ENV_ADMIN_SERVICE_URL: &str = "OAUTH_PROVIDER_ADMIN_SERVICE_URL";
pub const ENV_TIMEOUT_MS: &str = "OAUTH_PROVIDER_TIMEOUT_MS";

/// External provider configuration.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Base URL of the client-facing service.
    pub public_base_url: Url,
    /// Base URL of the administrative service.
    pub admin_base_url: Url,
    /// HTTP timeout for every provider call.
    pub timeout: Duration,
    /// Upper bound on a provider response body.
    pub max_response_size: usize,
}

impl ProviderConfig {
    /// Create a configuration builder.
    pub fn builder() -> crate::builders::ProviderConfigBuilder {
        crate::builders::ProviderConfigBuilder::new()
    }

    /// Load configuration from the environment.
    ///
    /// Requires `OAUTH_PROVIDER_PUBLIC_SERVICE_URL` and
    /// `OAUTH_PROVIDER_ADMIN_SERVICE_URL`. `OAUTH_PROVIDER_TIMEOUT_MS` is optional.
    pub fn from_env() -> Result<Self, RevocationError> {
        let public = std::env::var(ENV_PUBLIC_SERVICE_URL).map_err(|_| {
            ConfigurationError::Environment {
                message: format!("{} must be set", ENV_PUBLIC_SERVICE_URL),
            }
        })?;
        let admin = std::env::var(ENV_ADMIN_SERVICE_URL).map_err(|_| {
            ConfigurationError::Environment {
                message: format!("{} must be set", ENV_ADMIN_SERVICE_URL),
            }
        })?;

        let mut builder = Self::builder()
            .public_base_url(public)
            .admin_base_url(admin);

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            let ms: u64 = raw.parse().map_err(|_| ConfigurationError::Environment {
                message: format!("{} must be an integer, got {:?}", ENV_TIMEOUT_MS, raw),
            })?;
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Base URL for a channel.
    pub fn base_url(&self, channel: Channel) -> &Url {
        match channel {
            Channel::Public => &self.public_base_url,
            Channel::Admin => &self.admin_base_url,
        }
    }

    /// Absolute endpoint URL for a channel and path.
    ///
    /// The path is appended to the base URL, so a base with a path prefix
    /// (e.g. `http://host/hydra`) keeps it.
    pub fn endpoint(&self, channel: Channel, path: &str) -> Result<Url, RevocationError> {
        let url = format!(
            "{}/{}",
            self.base_url(channel).as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url).map_err(|_| {
            RevocationError::Configuration(ConfigurationError::InvalidEndpoint { url })
        })
    }
}

/// Trust boundary used for a provider call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Client-facing endpoints.
    Public,
    /// Elevated-trust administrative endpoints.
    Admin,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Admin => "admin",
        }
    }
}
