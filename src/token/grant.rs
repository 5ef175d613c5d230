//! Grant Revocation
//!
//! Local revocation of grants (refresh-token sessions) and access tokens.

use std::sync::Arc;

use crate::error::RevocationError;
use crate::token::SessionStore;
use crate::types::RequestContext;

/// Revokes grants and access tokens in the session store.
///
/// Both operations are idempotent at the store.
pub struct GrantRevoker<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> GrantRevoker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Revoke the grant behind a refresh token.
    pub async fn revoke_grant(
        &self,
        ctx: &RequestContext,
        grant_id: &str,
    ) -> Result<(), RevocationError> {
        self.store.revoke_grant(ctx, grant_id).await
    }

    /// Revoke an access token directly.
    pub async fn revoke_access_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<(), RevocationError> {
        self.store.revoke_access_token(ctx, token).await
    }
}
