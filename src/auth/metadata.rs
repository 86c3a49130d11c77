//! Authentication with tokens from a local metadata source.

use std::fmt;
use std::sync::Arc;

use super::{
    AuthFuture, AuthMetadata, AuthService, LegacyTokenAdapter, LegacyTokenProvider, TokenProvider,
};
use crate::config::RetryConfig;
use crate::time::Sleeper;

/// Authenticates with a token from a [`TokenProvider`].
///
/// The provider is fixed at construction. Poll-based providers are wrapped
/// in a [`LegacyTokenAdapter`] by [`legacy`](Self::legacy) and
/// [`legacy_with`](Self::legacy_with). Provider errors reach the caller
/// unchanged.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::{AuthService, LegacyTokenProvider, MetadataAuthService};
///
/// struct Ready;
///
/// impl LegacyTokenProvider for Ready {
///     fn token(&self) -> Option<String> {
///         Some("t1.local".into())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let service = MetadataAuthService::legacy(Ready);
/// assert_eq!(service.auth_metadata().await?.ticket(), Some("t1.local"));
/// # Ok::<(), ydb_auth::Error>(())
/// # });
/// ```
#[derive(Clone)]
pub struct MetadataAuthService {
    provider: Arc<dyn TokenProvider>,
}

impl MetadataAuthService {
    /// Uses a modern provider directly.
    pub fn new(provider: impl TokenProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Adapts a legacy provider with the default poll.
    pub fn legacy(provider: impl LegacyTokenProvider + 'static) -> Self {
        Self::new(LegacyTokenAdapter::new(provider))
    }

    /// Adapts a legacy provider with a custom poll and sleeper.
    pub fn legacy_with(
        provider: impl LegacyTokenProvider + 'static,
        retry: RetryConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self::new(LegacyTokenAdapter::with_retry(provider, retry, sleeper))
    }

    /// Uses the instance metadata service.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    #[cfg(feature = "rest")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rest")))]
    pub fn from_metadata_service() -> Result<Self, crate::Error> {
        Ok(Self::new(super::MetadataTokenService::new()?))
    }
}

impl AuthService for MetadataAuthService {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        Box::pin(async move {
            let token = self.provider.fetch_token().await?;
            Ok(AuthMetadata::with_ticket(token))
        })
    }
}

impl fmt::Debug for MetadataAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataAuthService").finish_non_exhaustive()
    }
}
