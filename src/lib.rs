//! OAuth2 Token Revocation
//!
//! Revocation of client-supplied tokens against an external OAuth2 provider
//! and the local session store.
//!
//! # Features
//!
//! - Token classification by refresh-token prefix
//! - Client credentials from a Basic header or request body fields
//! - Token Introspection (RFC 7662) before revocation
//! - Token Revocation (RFC 7009) with header forwarding
//! - Grant revocation gated on the provider accepting the client
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_revocation::{
//!     InMemorySessionStore, ProviderConfig, RequestContext, RevocationClient,
//!     RevocationOutcome, RevokeTokenRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig::builder()
//!         .public_base_url("https://auth.example.com")
//!         .admin_base_url("http://auth-admin.internal:4445")
//!         .build()?;
//!
//!     let client = RevocationClient::new(config, InMemorySessionStore::new())?;
//!
//!     let request = RevokeTokenRequest::new("st_rt_...")
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret");
//!
//!     match client.revoke(&RequestContext::default(), request).await? {
//!         RevocationOutcome::Revoked => println!("{{\"status\":\"OK\"}}"),
//!         RevocationOutcome::ProviderRejected(failure) => {
//!             println!("provider said {}: {}", failure.status, failure.body)
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: request, context, credential and outcome types
//! - `error`: error hierarchy with input/internal classification
//! - `core`: HTTP transport and the provider proxy
//! - `token`: credential extraction, translation, introspection, revocation, store
//! - `flows`: the revoke orchestration
//! - `builders`: fluent builder for provider configuration
//! - `telemetry`: logging and metrics
//! - `client`: high-level client wiring everything together

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export main client
pub use client::RevocationClient;

// Re-export builders
pub use builders::ProviderConfigBuilder;

// Re-export errors
pub use error::{
    ConfigurationError, ErrorKind, InputError, NetworkError, ProtocolError, RevocationError,
    RevocationResult, StorageError, ValidationError,
};

// Re-export types
pub use types::{
    // Token
    classify, TokenKind, REFRESH_TOKEN_PREFIX,
    // Config
    Channel, ProviderConfig,
    // Context
    AppIdentifier, RequestContext,
    // Credentials
    ClientCredentials,
    // Introspection
    IntrospectionResponse, IntrospectionResult,
    // Request / outcome
    ProviderFailure, RevocationOutcome, RevocationStatus, RevokeTokenRequest,
    RevokeTokenResponse,
};

// Re-export core components
pub use core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ProviderProxy,
    ProxyResponse, ReqwestHttpTransport,
};

// Re-export flows
pub use flows::RevokeTokenFlow;

// Re-export token components
pub use token::{
    // Credentials
    ClientCredentialExtractor, ExtractedCredentials,
    // Translation
    TokenTranslator,
    // Introspection
    DefaultTokenIntrospector, MockTokenIntrospector, TokenIntrospector,
    // Revocation
    DefaultTokenRevoker, ExternalRevocation, MockTokenRevoker, TokenRevoker,
    // Grants
    GrantRevoker,
    // Storage
    InMemorySessionStore, MockSessionStore, SessionStore,
};

// Re-export telemetry
pub use telemetry::{
    // Metrics
    InMemoryMetrics, MetricEntry, MetricLabels, NoOpMetrics, RevocationMetrics,
    // Logging
    InMemoryLogger, LogEntry, LogLevel, Logger, NoOpLogger,
    RevocationLogContext, TracingLogger,
};
