//! Revoke Token Flow
//!
//! Orchestrates revocation of a client-supplied token.
//!
//! Access tokens are revoked directly in the session store. Refresh tokens
//! go through translation, introspection and the provider's revoke endpoint;
//! the internal grant is revoked only once the provider has accepted the
//! call, since that acceptance is what authenticates the client.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{RevocationError, RevocationResult};
use crate::telemetry::{Logger, RevocationLogContext, RevocationMetrics};
use crate::token::{
    ClientCredentialExtractor, ExternalRevocation, GrantRevoker, SessionStore, TokenIntrospector,
    TokenRevoker, TokenTranslator,
};
use crate::types::{
    classify, RequestContext, RevocationOutcome, RevocationStatus, RevokeTokenRequest, TokenKind,
};

/// Revoke token flow.
pub struct RevokeTokenFlow<S, I, R>
where
    S: SessionStore,
    I: TokenIntrospector,
    R: TokenRevoker,
{
    translator: TokenTranslator<S>,
    grants: GrantRevoker<S>,
    introspector: Arc<I>,
    revoker: Arc<R>,
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn RevocationMetrics>,
}

impl<S, I, R> RevokeTokenFlow<S, I, R>
where
    S: SessionStore,
    I: TokenIntrospector,
    R: TokenRevoker,
{
    /// Create new revoke flow.
    pub fn new(
        store: Arc<S>,
        introspector: Arc<I>,
        revoker: Arc<R>,
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn RevocationMetrics>,
    ) -> Self {
        Self {
            translator: TokenTranslator::new(store.clone()),
            grants: GrantRevoker::new(store),
            introspector,
            revoker,
            logger,
            metrics,
        }
    }

    /// Revoke the token named in `request`.
    ///
    /// Returns [`RevocationOutcome::ProviderRejected`] when the provider
    /// refused the revoke call; the caller relays that response and writes
    /// nothing else.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: &RevokeTokenRequest,
    ) -> RevocationResult<RevocationOutcome> {
        let kind = classify(&request.token);
        let log_ctx = RevocationLogContext::from_request(ctx)
            .operation("revoke")
            .extra("token_kind", kind.as_str());
        let start = Instant::now();

        self.logger.debug("Revoke request classified", &log_ctx);

        let result = match kind {
            TokenKind::AccessToken => self.revoke_access_token(ctx, request, &log_ctx).await,
            TokenKind::RefreshToken => self.revoke_refresh_token(ctx, request, &log_ctx).await,
        };

        let status = RevocationStatus::of(&result);
        let log_ctx = log_ctx
            .extra("status", status.as_str())
            .extra("duration_ms", start.elapsed().as_millis().to_string());
        match &result {
            Ok(RevocationOutcome::Revoked) => self.logger.info("Token revoked", &log_ctx),
            Ok(RevocationOutcome::ProviderRejected(failure)) => self.logger.warn(
                &format!("Provider rejected revoke call with status {}", failure.status),
                &log_ctx,
            ),
            Err(e) => {
                self.metrics.record_error(e.error_code());
                self.report_error(e, &log_ctx);
            }
        }
        self.metrics.record_revocation(kind.as_str(), status.as_str());

        result
    }

    async fn revoke_access_token(
        &self,
        ctx: &RequestContext,
        request: &RevokeTokenRequest,
        log_ctx: &RevocationLogContext,
    ) -> RevocationResult<RevocationOutcome> {
        self.grants.revoke_access_token(ctx, &request.token).await?;
        self.logger.debug("Access token revoked in session store", log_ctx);
        Ok(RevocationOutcome::Revoked)
    }

    async fn revoke_refresh_token(
        &self,
        ctx: &RequestContext,
        request: &RevokeTokenRequest,
        log_ctx: &RevocationLogContext,
    ) -> RevocationResult<RevocationOutcome> {
        // Input errors must surface before any network call.
        let extracted = ClientCredentialExtractor::extract(
            request.authorization_header.as_deref(),
            request.client_id.as_deref(),
            request.client_secret.as_deref(),
        )?;
        let log_ctx = log_ctx
            .clone()
            .client_id(extracted.credentials.client_id.clone());

        let internal_token = self.translator.to_internal(ctx, &request.token).await?;
        self.logger.debug("Refresh token translated", &log_ctx);

        let introspection = self.introspector.introspect(ctx, &internal_token).await?;
        let grant_id = if introspection.active {
            introspection.grant_id
        } else {
            None
        };
        self.logger.debug(
            &format!(
                "Introspection finished (active: {}, grant: {})",
                introspection.active,
                grant_id.is_some()
            ),
            &log_ctx,
        );

        let external = self
            .revoker
            .revoke(
                ctx,
                &internal_token,
                &extracted.credentials,
                extracted.forward_header.as_deref(),
            )
            .await?;

        if let ExternalRevocation::Rejected(failure) = external {
            return Ok(RevocationOutcome::ProviderRejected(failure));
        }

        if let Some(grant_id) = grant_id {
            self.grants.revoke_grant(ctx, &grant_id).await?;
            self.metrics.record_grant_revoked();
            self.logger.debug("Grant revoked", &log_ctx);
        }

        Ok(RevocationOutcome::Revoked)
    }

    fn report_error(&self, error: &RevocationError, log_ctx: &RevocationLogContext) {
        let message = format!("Revoke request failed: {}", error);
        if error.is_input_error() {
            self.logger.warn(&message, log_ctx);
        } else {
            self.logger.error(&message, log_ctx);
        }
    }
}
