//! Authentication strategies for YDB calls.
//!
//! Every strategy implements [`AuthService`] and yields an [`AuthMetadata`]
//! to attach to the outgoing call:
//!
//! - [`AnonymousAuthService`]: No credentials; the attachment is empty
//! - [`TokenAuthService`]: A fixed token
//! - [`IamAuthService`]: Service account key exchanged for short-lived IAM tokens
//! - [`MetadataAuthService`]: Tokens from a local [`TokenProvider`] or [`LegacyTokenProvider`]
//!
//! [`Credentials`] picks one of them from configuration.
//!
//! ## Service Account
//!
//! ```rust,ignore
//! use ydb_auth::{AuthService, Credentials, IamCredentials, DEFAULT_IAM_ENDPOINT};
//!
//! let credentials =
//!     IamCredentials::from_authorized_key_file("authorized_key.json", DEFAULT_IAM_ENDPOINT)?;
//! let auth = Credentials::from(credentials).into_auth_service()?;
//!
//! let mut request = tonic::Request::new(());
//! auth.auth_metadata().await?.apply_to_request(&mut request)?;
//! ```
//!
//! ## Inside a VM
//!
//! ```rust,ignore
//! use ydb_auth::MetadataAuthService;
//!
//! let auth = MetadataAuthService::from_metadata_service()?;
//! ```

mod anonymous;
mod credentials;
mod iam;
mod jwt;
mod metadata;
#[cfg(feature = "rest")]
mod metadata_service;
mod provider;
mod service;
mod static_token;
mod ticket;

pub use anonymous::AnonymousAuthService;
pub use credentials::{Credentials, DEFAULT_IAM_ENDPOINT, IamCredentials};
pub use iam::{IamAuthService, IamAuthServiceBuilder, TokenState};
pub use jwt::{AssertionClaims, IAM_TOKEN_AUDIENCE};
pub use metadata::MetadataAuthService;
#[cfg(feature = "rest")]
#[cfg_attr(docsrs, doc(cfg(feature = "rest")))]
pub use metadata_service::MetadataTokenService;
pub use provider::{
    InitializeFuture, LegacyTokenAdapter, LegacyTokenProvider, TokenFuture, TokenProvider,
};
pub use service::{AuthFuture, AuthService};
pub use static_token::TokenAuthService;
pub use ticket::{AUTH_TICKET_HEADER, AuthMetadata};
