//! Refresh Token Translation
//!
//! Maps the refresh token handed to clients onto the value the provider knows.

use std::sync::Arc;

use crate::error::RevocationError;
use crate::token::SessionStore;
use crate::types::RequestContext;

/// Translates external refresh tokens to their internal representation.
pub struct TokenTranslator<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> TokenTranslator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Look up the internal token. Store failures propagate unchanged.
    pub async fn to_internal(
        &self,
        ctx: &RequestContext,
        external_token: &str,
    ) -> Result<String, RevocationError> {
        self.store.translate_refresh_token(ctx, external_token).await
    }
}
