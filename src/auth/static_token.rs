//! Fixed token authentication.

use std::fmt;
use std::sync::Arc;

use super::{AuthFuture, AuthMetadata, AuthService};

/// Sends every call with the same token.
///
/// No expiry, no network access. Suitable for development or when token
/// rotation happens outside the process.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::{AuthService, TokenAuthService};
///
/// # tokio_test::block_on(async {
/// let service = TokenAuthService::new("t1.static");
/// let metadata = service.auth_metadata().await?;
/// assert_eq!(metadata.ticket(), Some("t1.static"));
/// # Ok::<(), ydb_auth::Error>(())
/// # });
/// ```
#[derive(Clone)]
pub struct TokenAuthService {
    token: Arc<str>,
}

impl TokenAuthService {
    /// Creates the strategy for a fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }

    /// Returns the token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl AuthService for TokenAuthService {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        let token = self.token.clone();
        Box::pin(async move { Ok(AuthMetadata::with_ticket(token)) })
    }
}

impl fmt::Debug for TokenAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthService")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl<S: Into<String>> From<S> for TokenAuthService {
    fn from(token: S) -> Self {
        Self::new(token)
    }
}
