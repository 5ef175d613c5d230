//! Token Revocation
//!
//! RFC 7009 revocation at the provider's public endpoint, on behalf of the
//! requesting client.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::core::{HttpTransport, ProviderProxy, ProxyResponse};
use crate::error::RevocationError;
use crate::types::{Channel, ClientCredentials, ProviderFailure, RequestContext, REVOKE_PATH};

/// Result of a revoke call that reached the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExternalRevocation {
    /// The provider accepted the call, which also proves the client
    /// credentials were valid.
    Accepted,
    /// The provider refused the call; its response is terminal.
    Rejected(ProviderFailure),
}

/// Token revoker interface.
#[async_trait]
pub trait TokenRevoker: Send + Sync {
    /// Revoke `token` at the provider as the given client.
    ///
    /// `forward_header` is sent as the `Authorization` header unchanged.
    async fn revoke(
        &self,
        ctx: &RequestContext,
        token: &str,
        credentials: &ClientCredentials,
        forward_header: Option<&str>,
    ) -> Result<ExternalRevocation, RevocationError>;
}

/// Default token revoker implementation.
pub struct DefaultTokenRevoker<T: HttpTransport> {
    proxy: Arc<ProviderProxy<T>>,
}

impl<T: HttpTransport> DefaultTokenRevoker<T> {
    /// Create new token revoker.
    pub fn new(proxy: Arc<ProviderProxy<T>>) -> Self {
        Self { proxy }
    }

    fn build_form(token: &str, credentials: &ClientCredentials) -> Vec<(&'static str, String)> {
        let mut form = vec![("token", token.to_string())];
        form.extend(credentials.form_fields());
        form
    }
}

#[async_trait]
impl<T: HttpTransport> TokenRevoker for DefaultTokenRevoker<T> {
    async fn revoke(
        &self,
        ctx: &RequestContext,
        token: &str,
        credentials: &ClientCredentials,
        forward_header: Option<&str>,
    ) -> Result<ExternalRevocation, RevocationError> {
        let form = Self::build_form(token, credentials);

        let mut headers = HashMap::new();
        if let Some(header) = forward_header {
            headers.insert("Authorization".to_string(), header.to_string());
        }

        let response = self
            .proxy
            .post_form(ctx, Channel::Public, REVOKE_PATH, &form, &headers)
            .await?;

        Ok(match response {
            ProxyResponse::Success(_) => ExternalRevocation::Accepted,
            ProxyResponse::HandledFailure(failure) => ExternalRevocation::Rejected(failure),
        })
    }
}

/// Revoke call recorded by [`MockTokenRevoker`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevokeCall {
    pub token: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub forward_header: Option<String>,
}

/// Mock token revoker for testing.
#[derive(Default)]
pub struct MockTokenRevoker {
    revoke_history: Mutex<Vec<RevokeCall>>,
    responses: Mutex<VecDeque<Result<ExternalRevocation, RevocationError>>>,
}

impl MockTokenRevoker {
    /// Create new mock revoker. Calls are accepted unless something is queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next call with the given provider response.
    pub fn queue_rejection(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ExternalRevocation::Rejected(ProviderFailure {
                status,
                body: body.to_string(),
            })));
        self
    }

    /// Fail the next call.
    pub fn queue_error(&self, error: RevocationError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Get revocation history.
    pub fn get_revoke_history(&self) -> Vec<RevokeCall> {
        self.revoke_history.lock().unwrap().clone()
    }

    /// Check if a specific token was sent for revocation.
    pub fn was_revoked(&self, token: &str) -> bool {
        self.revoke_history
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.token == token)
    }
}

#[async_trait]
impl TokenRevoker for MockTokenRevoker {
    async fn revoke(
        &self,
        _ctx: &RequestContext,
        token: &str,
        credentials: &ClientCredentials,
        forward_header: Option<&str>,
    ) -> Result<ExternalRevocation, RevocationError> {
        self.revoke_history.lock().unwrap().push(RevokeCall {
            token: token.to_string(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.secret().map(String::from),
            forward_header: forward_header.map(String::from),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ExternalRevocation::Accepted))
    }
}
