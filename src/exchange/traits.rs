//! Token exchange trait and wire-neutral request/response types.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use chrono::{DateTime, Utc};

use crate::Error;

/// A type alias for the boxed future returned by [`TokenExchange::create_token`].
pub type ExchangeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CreateTokenResponse, Error>> + Send + 'a>>;

/// A signed assertion to trade for an IAM token.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateTokenRequest {
    /// The compact-serialized JWT.
    pub jwt: String,
}

impl CreateTokenRequest {
    /// Creates a request for the given assertion.
    pub fn new(jwt: impl Into<String>) -> Self {
        Self { jwt: jwt.into() }
    }
}

impl fmt::Debug for CreateTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTokenRequest")
            .field("jwt", &"[REDACTED]")
            .finish()
    }
}

/// The exchange endpoint's answer.
///
/// `iam_token` may be empty; the caller decides what that means.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CreateTokenResponse {
    /// The issued IAM token.
    pub iam_token: String,

    /// Server-reported expiry, when provided.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateTokenResponse {
    /// Creates a response carrying only a token.
    pub fn new(iam_token: impl Into<String>) -> Self {
        Self {
            iam_token: iam_token.into(),
            expires_at: None,
        }
    }
}

impl fmt::Debug for CreateTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTokenResponse")
            .field("iam_token", &if self.iam_token.is_empty() { "" } else { "[REDACTED]" })
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Remote authority that converts a signed assertion into an IAM token.
///
/// Implementations perform exactly one call per invocation; timeouts and
/// caching are applied by [`IamAuthService`](crate::auth::IamAuthService).
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn TokenExchange>`.
pub trait TokenExchange: Send + Sync {
    /// Submits `request` and returns the endpoint's response.
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_>;
}

impl<T: TokenExchange + ?Sized> TokenExchange for Arc<T> {
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_> {
        (**self).create_token(request)
    }
}

impl<T: TokenExchange + ?Sized> TokenExchange for Box<T> {
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_> {
        (**self).create_token(request)
    }
}
