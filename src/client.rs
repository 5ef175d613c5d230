//! Revocation Client
//!
//! High-level entry point that wires the provider transport, the session
//! store and telemetry into a revoke flow.

use std::sync::Arc;

use crate::core::{HttpTransport, ProviderProxy, ReqwestHttpTransport};
use crate::error::{RevocationError, RevocationResult};
use crate::flows::RevokeTokenFlow;
use crate::telemetry::{Logger, NoOpMetrics, RevocationMetrics, TracingLogger};
use crate::token::{DefaultTokenIntrospector, DefaultTokenRevoker, SessionStore};
use crate::types::{ProviderConfig, RequestContext, RevocationOutcome, RevokeTokenRequest};

/// Client for revoking tokens issued through the provider.
pub struct RevocationClient<S: SessionStore, T: HttpTransport = ReqwestHttpTransport> {
    config: ProviderConfig,
    store: Arc<S>,
    flow: RevokeTokenFlow<S, DefaultTokenIntrospector<T, S>, DefaultTokenRevoker<T>>,
}

impl<S: SessionStore> RevocationClient<S, ReqwestHttpTransport> {
    /// Create a client with the default transport and `tracing` logging.
    pub fn new(config: ProviderConfig, store: S) -> Result<Self, RevocationError> {
        let transport = ReqwestHttpTransport::from_config(&config)?;
        Ok(Self::with_components(
            config,
            transport,
            store,
            Arc::new(TracingLogger::new()),
            Arc::new(NoOpMetrics),
        ))
    }
}

impl<S: SessionStore, T: HttpTransport> RevocationClient<S, T> {
    /// Create a client with custom implementations.
    pub fn with_components(
        config: ProviderConfig,
        transport: T,
        store: S,
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn RevocationMetrics>,
    ) -> Self {
        let store = Arc::new(store);
        let proxy = Arc::new(ProviderProxy::new(
            config.clone(),
            Arc::new(transport),
            logger.clone(),
            metrics.clone(),
        ));
        let introspector = Arc::new(DefaultTokenIntrospector::new(
            proxy.clone(),
            store.clone(),
            metrics.clone(),
        ));
        let revoker = Arc::new(DefaultTokenRevoker::new(proxy));

        Self {
            config,
            store: store.clone(),
            flow: RevokeTokenFlow::new(store, introspector, revoker, logger, metrics),
        }
    }

    /// Get the provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Get the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Revoke a token.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        request: RevokeTokenRequest,
    ) -> RevocationResult<RevocationOutcome> {
        self.flow.execute(ctx, &request).await
    }

    /// Validate a raw JSON body and revoke the token it names.
    pub async fn revoke_json(
        &self,
        ctx: &RequestContext,
        body: &serde_json::Value,
    ) -> RevocationResult<RevocationOutcome> {
        let request = RevokeTokenRequest::from_json(body)?;
        self.revoke(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::telemetry::{InMemoryMetrics, NoOpLogger};
    use crate::token::InMemorySessionStore;
    use crate::types::AppIdentifier;
    use base64::Engine;

    fn config() -> ProviderConfig {
        ProviderConfig::builder()
            .public_base_url("http://public.test")
            .admin_base_url("http://admin.test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_client() {
        let client = RevocationClient::new(config(), InMemorySessionStore::new()).unwrap();
        assert_eq!(client.config().admin_base_url.as_str(), "http://admin.test/");
    }

    #[tokio::test]
    async fn test_refresh_token_end_to_end() {
        let app = AppIdentifier::new("example.com", "app1");
        let ctx = RequestContext::new(app.clone());

        let store = InMemorySessionStore::new();
        store.register_refresh_token(&app, "st_rt_ext", "ory_rt_int");
        store.register_grant(&app, "ory_rt_int", "g1", "abc");

        let transport = MockHttpTransport::new();
        transport.queue_json_response(
            200,
            &serde_json::json!({"active": true, "client_id": "abc", "exp": 1999999999}),
        );
        transport.queue_json_response(200, &serde_json::json!({}));

        let metrics = Arc::new(InMemoryMetrics::new());
        let client = RevocationClient::with_components(
            config(),
            transport,
            store,
            Arc::new(NoOpLogger),
            metrics.clone(),
        );

        let header = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("abc:secret123")
        );
        let outcome = client
            .revoke_json(
                &ctx,
                &serde_json::json!({"token": "st_rt_ext", "authorizationHeader": header}),
            )
            .await
            .unwrap();

        assert_eq!(outcome, RevocationOutcome::Revoked);
        assert!(client.store().is_grant_revoked(&app, "g1"));
        assert_eq!(
            metrics
                .get_entries_by_name("revocation_provider_calls_total")
                .len(),
            2
        );
        assert_eq!(
            metrics
                .get_entries_by_name("revocation_grants_revoked_total")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_revoke_json_rejects_missing_token() {
        let client = RevocationClient::with_components(
            config(),
            MockHttpTransport::new(),
            InMemorySessionStore::new(),
            Arc::new(NoOpLogger),
            Arc::new(NoOpMetrics),
        );

        let err = client
            .revoke_json(&RequestContext::default(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
