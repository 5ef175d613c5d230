//! Token Management
//!
//! The pieces the revocation flow is assembled from:
//!
//! - **Credentials**: client identity from a Basic header or body fields
//! - **Translation**: external to internal refresh token mapping
//! - **Introspection**: RFC 7662 introspection plus payload validation
//! - **Revocation**: RFC 7009 revocation at the provider
//! - **Grants**: local grant and access-token revocation
//! - **Storage**: the session store interface and test doubles

pub mod credentials;
pub mod grant;
pub mod introspection;
pub mod revocation;
pub mod storage;
pub mod translation;

pub use credentials::{ClientCredentialExtractor, ExtractedCredentials};
pub use grant::GrantRevoker;
pub use introspection::{DefaultTokenIntrospector, MockTokenIntrospector, TokenIntrospector};
pub use revocation::{
    DefaultTokenRevoker, ExternalRevocation, MockTokenRevoker, RevokeCall, TokenRevoker,
};
pub use storage::{InMemorySessionStore, MockSessionStore, SessionStore, StoreCall};
pub use translation::TokenTranslator;
