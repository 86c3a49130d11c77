//! # ydb-auth
//!
//! Credential providers for YDB clients.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ydb_auth::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ydb_auth::Error> {
//!     let credentials =
//!         IamCredentials::from_authorized_key_file("authorized_key.json", DEFAULT_IAM_ENDPOINT)?;
//!     let auth = Credentials::from(credentials).into_auth_service()?;
//!
//!     // Once per outgoing call
//!     let metadata = auth.auth_metadata().await?;
//!     println!("{:?}", metadata);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **One capability**: every strategy implements [`AuthService`]
//! - **One header**: tokens travel as `x-ydb-auth-ticket`; anonymous calls carry nothing
//! - **Cached IAM tokens**: reused for 120s, then refreshed on the next call
//! - **Errors are not swallowed**: a failed refresh fails the call that needed it
//!
//! ## Features
//!
//! - `grpc` (default): gRPC IAM exchange and `tonic` metadata conversion
//! - `rest` (default): REST IAM exchange, instance metadata provider, `reqwest` header conversion
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)
//! - `tracing`: Enable tracing integration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod time;

mod retry;
#[cfg(any(feature = "grpc", feature = "rest"))]
mod user_agent;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use error::{Error, ErrorKind, Result};

// Re-export auth types
pub use auth::{
    AUTH_TICKET_HEADER, AnonymousAuthService, AuthFuture, AuthMetadata, AuthService, Credentials,
    DEFAULT_IAM_ENDPOINT, IamAuthService, IamAuthServiceBuilder, IamCredentials, InitializeFuture,
    LegacyTokenAdapter, LegacyTokenProvider, MetadataAuthService, TokenAuthService, TokenFuture,
    TokenProvider, TokenState,
};

#[cfg(feature = "rest")]
pub use auth::MetadataTokenService;

// Re-export config types
pub use config::{IamConfig, MetadataServiceConfig, RetryConfig};
