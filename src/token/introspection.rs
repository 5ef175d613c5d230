//! Token Introspection
//!
//! RFC 7662 introspection against the provider's administrative channel,
//! followed by validation of the payload against the session store.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::core::{HttpTransport, ProviderProxy, ProxyResponse};
use crate::error::{ProtocolError, RevocationError};
use crate::telemetry::RevocationMetrics;
use crate::token::SessionStore;
use crate::types::{
    Channel, IntrospectionResponse, IntrospectionResult, RequestContext, INTROSPECT_PATH,
};

/// Token introspection interface.
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    /// Introspect an internal token.
    ///
    /// An inactive token is a normal result, not an error.
    async fn introspect(
        &self,
        ctx: &RequestContext,
        internal_token: &str,
    ) -> Result<IntrospectionResult, RevocationError>;
}

/// Default token introspector implementation.
pub struct DefaultTokenIntrospector<T: HttpTransport, S: SessionStore> {
    proxy: Arc<ProviderProxy<T>>,
    store: Arc<S>,
    metrics: Arc<dyn RevocationMetrics>,
}

impl<T: HttpTransport, S: SessionStore> DefaultTokenIntrospector<T, S> {
    /// Create new token introspector.
    pub fn new(
        proxy: Arc<ProviderProxy<T>>,
        store: Arc<S>,
        metrics: Arc<dyn RevocationMetrics>,
    ) -> Self {
        Self {
            proxy,
            store,
            metrics,
        }
    }
}

#[async_trait]
impl<T: HttpTransport, S: SessionStore> TokenIntrospector for DefaultTokenIntrospector<T, S> {
    async fn introspect(
        &self,
        ctx: &RequestContext,
        internal_token: &str,
    ) -> Result<IntrospectionResult, RevocationError> {
        let form = [("token", internal_token.to_string())];
        let response = self
            .proxy
            .post_form(ctx, Channel::Admin, INTROSPECT_PATH, &form, &HashMap::new())
            .await?;

        let body = match response {
            ProxyResponse::Success(body) => body,
            ProxyResponse::HandledFailure(failure) => {
                return Err(RevocationError::Protocol(ProtocolError::InvalidResponse {
                    message: format!(
                        "introspection endpoint responded with status {}",
                        failure.status
                    ),
                }));
            }
        };

        let payload = IntrospectionResponse::from_json(body)?;
        let client_id = payload.client_id.clone();

        let payload = self
            .store
            .validate_introspection_payload(ctx, payload, internal_token, client_id.as_deref())
            .await?;

        let result = IntrospectionResult::from_response(&payload)?;
        self.metrics.record_introspection(result.active);
        Ok(result)
    }
}

/// Mock token introspector for testing.
#[derive(Default)]
pub struct MockTokenIntrospector {
    introspect_history: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Result<IntrospectionResult, RevocationError>>>,
    active_tokens: Mutex<HashMap<String, IntrospectionResult>>,
}

impl MockTokenIntrospector {
    /// Create new mock introspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next call.
    pub fn queue_result(&self, result: IntrospectionResult) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(result));
        self
    }

    /// Queue an error for the next call.
    pub fn queue_error(&self, error: RevocationError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Register an active token with its grant.
    pub fn add_active_token(&self, token: &str, grant_id: &str, expiry: i64) -> &Self {
        self.active_tokens.lock().unwrap().insert(
            token.to_string(),
            IntrospectionResult {
                active: true,
                grant_id: Some(grant_id.to_string()),
                expiry: Some(expiry),
                client_id: None,
            },
        );
        self
    }

    /// Tokens introspected so far, in order.
    pub fn get_introspect_history(&self) -> Vec<String> {
        self.introspect_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenIntrospector for MockTokenIntrospector {
    async fn introspect(
        &self,
        _ctx: &RequestContext,
        internal_token: &str,
    ) -> Result<IntrospectionResult, RevocationError> {
        self.introspect_history
            .lock()
            .unwrap()
            .push(internal_token.to_string());

        if let Some(result) = self.responses.lock().unwrap().pop_front() {
            return result;
        }

        if let Some(result) = self.active_tokens.lock().unwrap().get(internal_token) {
            return Ok(result.clone());
        }

        Ok(IntrospectionResult::default())
    }
}
