//! Token providers consumed by the metadata strategy.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use crate::Error;
use crate::config::RetryConfig;
use crate::time::{Sleeper, TokioSleeper};

/// A type alias for the boxed future returned by token providers.
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<String, Error>> + Send + 'a>>;

/// A type alias for the boxed future returned by [`LegacyTokenProvider::initialize`].
pub type InitializeFuture<'a> = Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>;

/// A token source with a single async fetch.
///
/// Errors are passed to the caller of
/// [`MetadataAuthService`](super::MetadataAuthService) unchanged.
///
/// ## Example: Environment Variable Provider
///
/// ```rust
/// use ydb_auth::{Error, TokenFuture, TokenProvider};
///
/// struct EnvTokenProvider {
///     env_var: String,
/// }
///
/// impl TokenProvider for EnvTokenProvider {
///     fn fetch_token(&self) -> TokenFuture<'_> {
///         let env_var = self.env_var.clone();
///         Box::pin(async move {
///             std::env::var(&env_var).map_err(|_| {
///                 Error::configuration(format!("environment variable {} not set", env_var))
///             })
///         })
///     }
/// }
/// ```
pub trait TokenProvider: Send + Sync {
    /// Fetches a token for immediate use.
    fn fetch_token(&self) -> TokenFuture<'_>;
}

impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    fn fetch_token(&self) -> TokenFuture<'_> {
        (**self).fetch_token()
    }
}

impl<T: TokenProvider + ?Sized> TokenProvider for Box<T> {
    fn fetch_token(&self) -> TokenFuture<'_> {
        (**self).fetch_token()
    }
}

/// An older, poll-based token source.
///
/// The getter is synchronous and may report no token while a background
/// refresh is still running. An optional async initializer can be offered
/// to prime it.
pub trait LegacyTokenProvider: Send + Sync {
    /// Returns the current token, or `None` if none is available yet.
    ///
    /// An empty string is treated the same as `None`.
    fn token(&self) -> Option<String>;

    /// Returns an initializer to await once when the first read is empty.
    ///
    /// The default offers none.
    fn initialize(&self) -> Option<InitializeFuture<'_>> {
        None
    }
}

impl<T: LegacyTokenProvider + ?Sized> LegacyTokenProvider for Arc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }

    fn initialize(&self) -> Option<InitializeFuture<'_>> {
        (**self).initialize()
    }
}

impl<T: LegacyTokenProvider + ?Sized> LegacyTokenProvider for Box<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }

    fn initialize(&self) -> Option<InitializeFuture<'_>> {
        (**self).initialize()
    }
}

/// Presents a [`LegacyTokenProvider`] as a [`TokenProvider`].
///
/// Fetching runs:
///
/// 1. `token()`; a non-empty value is returned at once.
/// 2. If the provider offers an initializer, await it, then `token()` again.
/// 3. While still empty, up to `retry.max_retries` more reads, each after
///    `retry.delay`.
/// 4. Otherwise fail with [`ErrorKind::MetadataExhausted`](crate::ErrorKind::MetadataExhausted).
pub struct LegacyTokenAdapter<P> {
    provider: P,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl<P: LegacyTokenProvider> LegacyTokenAdapter<P> {
    /// Wraps `provider` with the default poll (5 retries, 2000ms apart).
    pub fn new(provider: P) -> Self {
        Self::with_retry(provider, RetryConfig::default(), Arc::new(TokioSleeper))
    }

    /// Wraps `provider` with a custom poll and sleeper.
    pub fn with_retry(provider: P, retry: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            provider,
            retry,
            sleeper,
        }
    }

    /// Returns the poll configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    fn read(&self) -> Option<String> {
        self.provider.token().filter(|token| !token.is_empty())
    }

    async fn fetch(&self) -> Result<String, Error> {
        if let Some(token) = self.read() {
            return Ok(token);
        }

        if let Some(initialize) = self.provider.initialize() {
            initialize.await?;
            if let Some(token) = self.read() {
                return Ok(token);
            }
        }

        match crate::retry::poll(&self.retry, self.sleeper.as_ref(), || self.read()).await {
            Some(token) => Ok(token),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    max_retries = self.retry.max_retries,
                    "metadata token provider returned no token"
                );
                Err(Error::metadata_exhausted(self.retry.max_retries))
            }
        }
    }
}

impl<P: LegacyTokenProvider> TokenProvider for LegacyTokenAdapter<P> {
    fn fetch_token(&self) -> TokenFuture<'_> {
        Box::pin(self.fetch())
    }
}

impl<P> fmt::Debug for LegacyTokenAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyTokenAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
