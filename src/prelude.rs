//! Prelude module for convenient imports.
//!
//! ```rust
//! use ydb_auth::prelude::*;
//! ```
//!
//! This provides access to:
//! - The auth capability and every strategy
//! - Credential and provider types
//! - Error and configuration types

pub use crate::{
    auth::{
        AUTH_TICKET_HEADER, AnonymousAuthService, AuthMetadata, AuthService, Credentials,
        DEFAULT_IAM_ENDPOINT, IamAuthService, IamCredentials, LegacyTokenProvider,
        MetadataAuthService, TokenAuthService, TokenProvider,
    },
    config::{IamConfig, MetadataServiceConfig, RetryConfig},
    error::{Error, ErrorKind, Result},
};
