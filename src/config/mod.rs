//! Configuration types for credential providers.
//!
//! This module provides configuration options for:
//! - [`RetryConfig`]: Bounded fixed-delay polling of legacy token providers
//! - [`IamConfig`]: Assertion lifetime, token cache window and exchange timeout
//! - [`MetadataServiceConfig`]: Instance metadata endpoint and timeouts

mod iam;
mod metadata;
mod retry;

pub use iam::{DEFAULT_JWT_TTL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOKEN_TTL, IamConfig};
pub use metadata::{DEFAULT_METADATA_URL, MetadataServiceConfig};
pub use retry::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, RetryConfig};
