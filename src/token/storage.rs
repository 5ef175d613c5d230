//! Session Store
//!
//! Interface to the internal session/grant store, plus an in-memory store
//! and a recording mock.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{RevocationError, StorageError, ValidationError};
use crate::types::{AppIdentifier, IntrospectionResponse, RequestContext};

/// Session store interface.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Map an externally issued refresh token to its internal representation.
    async fn translate_refresh_token(
        &self,
        ctx: &RequestContext,
        external_token: &str,
    ) -> Result<String, RevocationError>;

    /// Check an introspection payload against stored state and return the
    /// refreshed payload.
    async fn validate_introspection_payload(
        &self,
        ctx: &RequestContext,
        payload: IntrospectionResponse,
        token: &str,
        client_id: Option<&str>,
    ) -> Result<IntrospectionResponse, RevocationError>;

    /// Revoke a grant. Revoking an unknown or already revoked grant succeeds.
    async fn revoke_grant(&self, ctx: &RequestContext, grant_id: &str)
        -> Result<(), RevocationError>;

    /// Revoke an access token. Revoking an unknown or already revoked token succeeds.
    async fn revoke_access_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<(), RevocationError>;
}

#[derive(Default)]
struct AppSessions {
    refresh_tokens: HashMap<String, String>,
    grants: HashMap<String, GrantRecord>,
    revoked_grants: HashSet<String>,
    revoked_access_tokens: HashSet<String>,
}

#[derive(Clone)]
struct GrantRecord {
    grant_id: String,
    client_id: String,
}

/// In-memory session store, partitioned per application.
#[derive(Default)]
pub struct InMemorySessionStore {
    apps: Mutex<HashMap<AppIdentifier, AppSessions>>,
    unavailable: Mutex<bool>,
}

impl InMemorySessionStore {
    /// Create new in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an external refresh token to an internal one.
    pub fn register_refresh_token(
        &self,
        app: &AppIdentifier,
        external_token: &str,
        internal_token: &str,
    ) -> &Self {
        self.apps
            .lock()
            .unwrap()
            .entry(app.clone())
            .or_default()
            .refresh_tokens
            .insert(external_token.to_string(), internal_token.to_string());
        self
    }

    /// Record the grant and client behind an internal token.
    pub fn register_grant(
        &self,
        app: &AppIdentifier,
        internal_token: &str,
        grant_id: &str,
        client_id: &str,
    ) -> &Self {
        self.apps
            .lock()
            .unwrap()
            .entry(app.clone())
            .or_default()
            .grants
            .insert(
                internal_token.to_string(),
                GrantRecord {
                    grant_id: grant_id.to_string(),
                    client_id: client_id.to_string(),
                },
            );
        self
    }

    /// Make every call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) -> &Self {
        *self.unavailable.lock().unwrap() = unavailable;
        self
    }

    /// Whether a grant has been revoked.
    pub fn is_grant_revoked(&self, app: &AppIdentifier, grant_id: &str) -> bool {
        self.apps
            .lock()
            .unwrap()
            .get(app)
            .map(|s| s.revoked_grants.contains(grant_id))
            .unwrap_or(false)
    }

    /// Whether an access token has been revoked.
    pub fn is_access_token_revoked(&self, app: &AppIdentifier, token: &str) -> bool {
        self.apps
            .lock()
            .unwrap()
            .get(app)
            .map(|s| s.revoked_access_tokens.contains(token))
            .unwrap_or(false)
    }

    fn check_available(&self) -> Result<(), RevocationError> {
        if *self.unavailable.lock().unwrap() {
            return Err(RevocationError::Storage(StorageError::Unavailable {
                message: "session store unreachable".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn translate_refresh_token(
        &self,
        ctx: &RequestContext,
        external_token: &str,
    ) -> Result<String, RevocationError> {
        self.check_available()?;

        self.apps
            .lock()
            .unwrap()
            .get(&ctx.app)
            .and_then(|s| s.refresh_tokens.get(external_token).cloned())
            .ok_or(RevocationError::Storage(StorageError::MappingNotFound))
    }

    async fn validate_introspection_payload(
        &self,
        ctx: &RequestContext,
        mut payload: IntrospectionResponse,
        token: &str,
        client_id: Option<&str>,
    ) -> Result<IntrospectionResponse, RevocationError> {
        self.check_available()?;

        if !payload.active {
            return Ok(payload);
        }

        let apps = self.apps.lock().unwrap();
        let sessions = apps.get(&ctx.app);
        let record = sessions.and_then(|s| s.grants.get(token)).cloned();

        if let (Some(record), Some(client_id)) = (&record, client_id) {
            if record.client_id != client_id {
                return Err(RevocationError::Validation(ValidationError::PayloadMismatch {
                    message: format!(
                        "token issued to {} but introspected for {}",
                        record.client_id, client_id
                    ),
                }));
            }
        }

        if payload.gid.is_none() {
            payload.gid = record.as_ref().map(|r| r.grant_id.clone());
        }

        let grant_revoked = match (&payload.gid, sessions) {
            (Some(gid), Some(s)) => s.revoked_grants.contains(gid),
            _ => false,
        };
        let expired = payload
            .exp
            .map(|exp| exp <= chrono::Utc::now().timestamp())
            .unwrap_or(false);

        if grant_revoked || expired {
            return Ok(IntrospectionResponse {
                client_id: payload.client_id,
                ..IntrospectionResponse::inactive()
            });
        }

        Ok(payload)
    }

    async fn revoke_grant(
        &self,
        ctx: &RequestContext,
        grant_id: &str,
    ) -> Result<(), RevocationError> {
        self.check_available()?;

        self.apps
            .lock()
            .unwrap()
            .entry(ctx.app.clone())
            .or_default()
            .revoked_grants
            .insert(grant_id.to_string());
        Ok(())
    }

    async fn revoke_access_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<(), RevocationError> {
        self.check_available()?;

        self.apps
            .lock()
            .unwrap()
            .entry(ctx.app.clone())
            .or_default()
            .revoked_access_tokens
            .insert(token.to_string());
        Ok(())
    }
}

/// Call recorded by [`MockSessionStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreCall {
    TranslateRefreshToken(String),
    ValidateIntrospectionPayload { token: String, client_id: Option<String> },
    RevokeGrant(String),
    RevokeAccessToken(String),
}

/// Mock session store for testing.
#[derive(Default)]
pub struct MockSessionStore {
    history: Mutex<Vec<StoreCall>>,
    translations: Mutex<HashMap<String, String>>,
    next_error: Mutex<Option<RevocationError>>,
    validation_error: Mutex<Option<RevocationError>>,
    revoke_error: Mutex<Option<RevocationError>>,
}

impl MockSessionStore {
    /// Create new mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an external token; unmapped tokens translate to themselves.
    pub fn add_translation(&self, external_token: &str, internal_token: &str) -> &Self {
        self.translations
            .lock()
            .unwrap()
            .insert(external_token.to_string(), internal_token.to_string());
        self
    }

    /// Fail the next call of any kind.
    pub fn set_next_error(&self, error: RevocationError) -> &Self {
        *self.next_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail the next payload validation.
    pub fn set_validation_error(&self, error: RevocationError) -> &Self {
        *self.validation_error.lock().unwrap() = Some(error);
        self
    }

    /// Fail the next grant or access-token revoke.
    pub fn set_revoke_error(&self, error: RevocationError) -> &Self {
        *self.revoke_error.lock().unwrap() = Some(error);
        self
    }

    /// Get call history.
    pub fn get_history(&self) -> Vec<StoreCall> {
        self.history.lock().unwrap().clone()
    }

    /// Grants revoked so far, in order.
    pub fn revoked_grants(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                StoreCall::RevokeGrant(gid) => Some(gid.clone()),
                _ => None,
            })
            .collect()
    }

    /// Access tokens revoked so far, in order.
    pub fn revoked_access_tokens(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                StoreCall::RevokeAccessToken(token) => Some(token.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) -> Result<(), RevocationError> {
        self.history.lock().unwrap().push(call);
        match self.next_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn translate_refresh_token(
        &self,
        _ctx: &RequestContext,
        external_token: &str,
    ) -> Result<String, RevocationError> {
        self.record(StoreCall::TranslateRefreshToken(external_token.to_string()))?;

        Ok(self
            .translations
            .lock()
            .unwrap()
            .get(external_token)
            .cloned()
            .unwrap_or_else(|| external_token.to_string()))
    }

    async fn validate_introspection_payload(
        &self,
        _ctx: &RequestContext,
        payload: IntrospectionResponse,
        token: &str,
        client_id: Option<&str>,
    ) -> Result<IntrospectionResponse, RevocationError> {
        self.record(StoreCall::ValidateIntrospectionPayload {
            token: token.to_string(),
            client_id: client_id.map(String::from),
        })?;

        if let Some(error) = self.validation_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(payload)
    }

    async fn revoke_grant(
        &self,
        _ctx: &RequestContext,
        grant_id: &str,
    ) -> Result<(), RevocationError> {
        self.record(StoreCall::RevokeGrant(grant_id.to_string()))?;

        if let Some(error) = self.revoke_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }

    async fn revoke_access_token(
        &self,
        _ctx: &RequestContext,
        token: &str,
    ) -> Result<(), RevocationError> {
        self.record(StoreCall::RevokeAccessToken(token.to_string()))?;

        if let Some(error) = self.revoke_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(gid: &str, client_id: &str, exp: i64) -> IntrospectionResponse {
        IntrospectionResponse {
            active: true,
            gid: Some(gid.to_string()),
            client_id: Some(client_id.to_string()),
            exp: Some(exp),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_translate_known_and_unknown() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();
        store.register_refresh_token(&ctx.app, "st_rt_ext", "ory_rt_int");

        assert_eq!(
            store.translate_refresh_token(&ctx, "st_rt_ext").await.unwrap(),
            "ory_rt_int"
        );
        assert!(matches!(
            store.translate_refresh_token(&ctx, "st_rt_other").await,
            Err(RevocationError::Storage(StorageError::MappingNotFound))
        ));
    }

    #[tokio::test]
    async fn test_mappings_are_per_app() {
        let store = InMemorySessionStore::new();
        let app1 = AppIdentifier::new("", "app1");
        store.register_refresh_token(&app1, "st_rt_ext", "ory_rt_int");

        let ctx = RequestContext::new(AppIdentifier::new("", "app2"));
        assert!(store.translate_refresh_token(&ctx, "st_rt_ext").await.is_err());
    }

    #[tokio::test]
    async fn test_validate_marks_revoked_grant_inactive() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();
        store.register_grant(&ctx.app, "ory_rt_int", "g1", "abc");
        store.revoke_grant(&ctx, "g1").await.unwrap();

        let refreshed = store
            .validate_introspection_payload(&ctx, active("g1", "abc", 1999999999), "ory_rt_int", Some("abc"))
            .await
            .unwrap();

        assert!(!refreshed.active);
        assert!(refreshed.gid.is_none());
    }

    #[tokio::test]
    async fn test_validate_marks_expired_inactive() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();

        let refreshed = store
            .validate_introspection_payload(&ctx, active("g1", "abc", 1000), "ory_rt_int", Some("abc"))
            .await
            .unwrap();

        assert!(!refreshed.active);
    }

    #[tokio::test]
    async fn test_validate_rejects_client_mismatch() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();
        store.register_grant(&ctx.app, "ory_rt_int", "g1", "abc");

        let result = store
            .validate_introspection_payload(&ctx, active("g1", "other", 1999999999), "ory_rt_int", Some("other"))
            .await;

        assert!(matches!(
            result,
            Err(RevocationError::Validation(ValidationError::PayloadMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_validate_fills_missing_gid() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();
        store.register_grant(&ctx.app, "ory_rt_int", "g7", "abc");

        let payload = IntrospectionResponse {
            active: true,
            client_id: Some("abc".to_string()),
            ..Default::default()
        };
        let refreshed = store
            .validate_introspection_payload(&ctx, payload, "ory_rt_int", Some("abc"))
            .await
            .unwrap();

        assert_eq!(refreshed.gid.as_deref(), Some("g7"));
    }

    #[tokio::test]
    async fn test_revokes_are_idempotent() {
        let store = InMemorySessionStore::new();
        let ctx = RequestContext::default();

        store.revoke_access_token(&ctx, "at").await.unwrap();
        store.revoke_access_token(&ctx, "at").await.unwrap();
        store.revoke_grant(&ctx, "unknown").await.unwrap();
        store.revoke_grant(&ctx, "unknown").await.unwrap();

        assert!(store.is_access_token_revoked(&ctx.app, "at"));
        assert!(store.is_grant_revoked(&ctx.app, "unknown"));
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = InMemorySessionStore::new();
        store.set_unavailable(true);
        let ctx = RequestContext::default();

        assert!(matches!(
            store.revoke_access_token(&ctx, "at").await,
            Err(RevocationError::Storage(StorageError::Unavailable { .. }))
        ));
    }

    #[tokio::test]
    async fn test_mock_store_records_calls() {
        let store = MockSessionStore::new();
        store.add_translation("st_rt_a", "int_a");
        let ctx = RequestContext::default();

        assert_eq!(
            store.translate_refresh_token(&ctx, "st_rt_a").await.unwrap(),
            "int_a"
        );
        store.revoke_grant(&ctx, "g1").await.unwrap();

        assert_eq!(
            store.get_history(),
            vec![
                StoreCall::TranslateRefreshToken("st_rt_a".to_string()),
                StoreCall::RevokeGrant("g1".to_string()),
            ]
        );
        assert_eq!(store.revoked_grants(), vec!["g1".to_string()]);
    }
}
