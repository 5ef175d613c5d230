//! Provider Proxy
//!
//! Form-encoded POSTs to the external provider with an explicit three-way
//! result: success, a failure the provider already answered, or an error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::core::{encode_form, HttpMethod, HttpRequest, HttpTransport};
use crate::error::{ProtocolError, RevocationError};
use crate::telemetry::{Logger, RevocationLogContext, RevocationMetrics};
use crate::types::{Channel, ProviderConfig, ProviderFailure, RequestContext};

/// Result of a provider call that reached the provider.
#[derive(Clone, Debug, PartialEq)]
pub enum ProxyResponse {
    /// 2xx with a JSON body (an empty body reads as `{}`).
    Success(serde_json::Value),
    /// Non-2xx. The body is the provider's own error response.
    HandledFailure(ProviderFailure),
}

/// Sends form posts to the provider on behalf of a request.
pub struct ProviderProxy<T: HttpTransport> {
    config: ProviderConfig,
    transport: Arc<T>,
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn RevocationMetrics>,
}

impl<T: HttpTransport> ProviderProxy<T> {
    /// Create new proxy.
    pub fn new(
        config: ProviderConfig,
        transport: Arc<T>,
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn RevocationMetrics>,
    ) -> Self {
        Self {
            config,
            transport,
            logger,
            metrics,
        }
    }

    /// POST `form` to `path` on `channel`, adding `headers` verbatim.
    pub async fn post_form(
        &self,
        ctx: &RequestContext,
        channel: Channel,
        path: &str,
        form: &[(&str, String)],
        headers: &HashMap<String, String>,
    ) -> Result<ProxyResponse, RevocationError> {
        let url = self.config.endpoint(channel, path)?;

        let mut request_headers = HashMap::new();
        request_headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        request_headers.insert("accept".to_string(), "application/json".to_string());
        for (key, value) in headers {
            request_headers.insert(key.to_lowercase(), value.clone());
        }

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: request_headers,
            body: Some(encode_form(form)),
            timeout: Some(self.config.timeout),
        };

        let log_ctx = RevocationLogContext::from_request(ctx)
            .operation("provider_call")
            .extra("channel", channel.as_str())
            .extra("path", path);
        self.logger.debug("Sending provider request", &log_ctx);

        let started = Instant::now();
        let result = self.transport.send(request).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_provider_call(path, false, elapsed_ms);
                self.logger
                    .error(&format!("Provider request failed: {}", e), &log_ctx);
                return Err(e);
            }
        };

        self.metrics
            .record_provider_call(path, response.is_success(), elapsed_ms);

        if !response.is_success() {
            self.logger.warn(
                &format!("Provider responded with status {}", response.status),
                &log_ctx,
            );
            return Ok(ProxyResponse::HandledFailure(ProviderFailure {
                status: response.status,
                body: response.body,
            }));
        }

        if response.body.trim().is_empty() {
            return Ok(ProxyResponse::Success(serde_json::json!({})));
        }

        let body = serde_json::from_str(&response.body).map_err(|e| {
            RevocationError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        Ok(ProxyResponse::Success(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpResponse, MockHttpTransport};
    use crate::telemetry::{InMemoryMetrics, NoOpLogger};
    use crate::types::{INTROSPECT_PATH, REVOKE_PATH};

    fn proxy(transport: Arc<MockHttpTransport>) -> (ProviderProxy<MockHttpTransport>, Arc<InMemoryMetrics>) {
        let config = ProviderConfig::builder()
            .public_base_url("http://public.test")
            .admin_base_url("http://admin.test")
            .build()
            .unwrap();
        let metrics = Arc::new(InMemoryMetrics::new());
        (
            ProviderProxy::new(config, transport, Arc::new(NoOpLogger), metrics.clone()),
            metrics,
        )
    }

    #[tokio::test]
    async fn test_success_parses_json() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &serde_json::json!({"active": false}));
        let (proxy, metrics) = proxy(transport.clone());

        let response = proxy
            .post_form(
                &RequestContext::default(),
                Channel::Admin,
                INTROSPECT_PATH,
                &[("token", "t".to_string())],
                &HashMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            response,
            ProxyResponse::Success(serde_json::json!({"active": false}))
        );

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://admin.test/admin/oauth2/introspect");
        assert_eq!(request.form_fields()["token"], "t");
        assert_eq!(
            metrics
                .get_entries_by_name("revocation_provider_calls_total")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_empty_success_body_is_empty_object() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: String::new(),
        });
        let (proxy, _) = proxy(transport);

        let response = proxy
            .post_form(
                &RequestContext::default(),
                Channel::Public,
                REVOKE_PATH,
                &[],
                &HashMap::new(),
            )
            .await
            .unwrap();

        assert_eq!(response, ProxyResponse::Success(serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_non_success_is_handled_failure() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(401, &serde_json::json!({"error": "invalid_client"}));
        let (proxy, _) = proxy(transport.clone());

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Basic abc".to_string());

        let response = proxy
            .post_form(
                &RequestContext::default(),
                Channel::Public,
                REVOKE_PATH,
                &[("token", "t".to_string())],
                &headers,
            )
            .await
            .unwrap();

        match response {
            ProxyResponse::HandledFailure(failure) => {
                assert_eq!(failure.status, 401);
                assert!(failure.body.contains("invalid_client"));
            }
            other => panic!("expected handled failure, got {:?}", other),
        }

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.headers["authorization"], "Basic abc");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_error() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: "not json".to_string(),
        });
        let (proxy, _) = proxy(transport);

        let result = proxy
            .post_form(
                &RequestContext::default(),
                Channel::Admin,
                INTROSPECT_PATH,
                &[],
                &HashMap::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(RevocationError::Protocol(ProtocolError::InvalidJson { .. }))
        ));
    }
}
