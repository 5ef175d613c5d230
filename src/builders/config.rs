//! Configuration Builder
//!
//! Fluent builder for provider configuration.

use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, RevocationError};
use crate::types::{ProviderConfig, DEFAULT_MAX_RESPONSE_SIZE, DEFAULT_TIMEOUT_MS};

/// Provider configuration builder.
#[derive(Default)]
pub struct ProviderConfigBuilder {
    public_base_url: Option<String>,
    admin_base_url: Option<String>,
    timeout: Option<Duration>,
    max_response_size: Option<usize>,
}

impl ProviderConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client-facing service URL.
    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Set the administrative service URL.
    pub fn admin_base_url(mut self, url: impl Into<String>) -> Self {
        self.admin_base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set maximum accepted response size in bytes.
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = Some(size);
        self
    }

    /// Build the provider configuration.
    pub fn build(self) -> Result<ProviderConfig, RevocationError> {
        let public_base_url = parse_base_url("public_base_url", self.public_base_url)?;
        let admin_base_url = parse_base_url("admin_base_url", self.admin_base_url)?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(ProviderConfig {
            public_base_url,
            admin_base_url,
            timeout,
            max_response_size: self.max_response_size.unwrap_or(DEFAULT_MAX_RESPONSE_SIZE),
        })
    }
}

fn parse_base_url(field: &str, value: Option<String>) -> Result<Url, RevocationError> {
    let raw = value.ok_or_else(|| ConfigurationError::MissingRequired {
        field: field.to_string(),
    })?;

    let url = Url::parse(raw.trim()).map_err(|_| ConfigurationError::InvalidEndpoint {
        url: raw.clone(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigurationError::InvalidEndpoint { url: raw }.into());
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_success() {
        let config = ProviderConfigBuilder::new()
            .public_base_url("http://localhost:4444")
            .admin_base_url("http://localhost:4445")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.public_base_url.as_str(), "http://localhost:4444/");
        assert_eq!(config.admin_base_url.port(), Some(4445));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_response_size, DEFAULT_MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_builder_defaults_timeout() {
        let config = ProviderConfigBuilder::new()
            .public_base_url("https://auth.example.com")
            .admin_base_url("https://admin.example.com")
            .build()
            .unwrap();

        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_builder_missing_admin_url() {
        let result = ProviderConfigBuilder::new()
            .public_base_url("https://auth.example.com")
            .build();

        assert!(matches!(
            result,
            Err(RevocationError::Configuration(ConfigurationError::MissingRequired { .. }))
        ));
    }

    #[test]
    fn test_builder_rejects_non_http_url() {
        let result = ProviderConfigBuilder::new()
            .public_base_url("ftp://auth.example.com")
            .admin_base_url("https://admin.example.com")
            .build();
        assert!(result.is_err());

        let result = ProviderConfigBuilder::new()
            .public_base_url("not a url")
            .admin_base_url("https://admin.example.com")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ProviderConfigBuilder::new()
            .public_base_url("https://auth.example.com")
            .admin_base_url("https://admin.example.com")
            .timeout(Duration::ZERO)
            .build();

        assert!(result.is_err());
    }
}
