//! Service account authentication via signed-assertion exchange.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

use super::jwt::AssertionSigner;
use super::{AuthFuture, AuthMetadata, AuthService, IamCredentials};
use crate::Error;
use crate::config::IamConfig;
use crate::exchange::{CreateTokenRequest, TokenExchange};
use crate::time::{Clock, SystemClock};

/// Freshness of the cached IAM token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenState {
    /// No token has been obtained yet.
    Missing,
    /// A token is cached and still inside its validity window.
    Fresh,
    /// The cached token is older than the validity window.
    Expired,
}

#[derive(Clone)]
struct CachedToken {
    token: Arc<str>,
    acquired_at: DateTime<Utc>,
}

struct Inner {
    signer: AssertionSigner,
    exchange: Arc<dyn TokenExchange>,
    clock: Arc<dyn Clock>,
    config: IamConfig,
    cache: RwLock<Option<CachedToken>>,
}

impl Inner {
    fn token_ttl(&self) -> TimeDelta {
        TimeDelta::from_std(self.config.token_ttl).unwrap_or(TimeDelta::MAX)
    }

    fn state(&self) -> TokenState {
        match self.cache.read().as_ref() {
            None => TokenState::Missing,
            Some(cached) if self.clock.now() - cached.acquired_at > self.token_ttl() => {
                TokenState::Expired
            }
            Some(_) => TokenState::Fresh,
        }
    }

    fn fresh_token(&self) -> Option<Arc<str>> {
        let cache = self.cache.read();
        let cached = cache.as_ref()?;
        (self.clock.now() - cached.acquired_at <= self.token_ttl()).then(|| Arc::clone(&cached.token))
    }

    async fn refresh(&self) -> Result<Arc<str>, Error> {
        let jwt = self.signer.sign(self.clock.now(), self.config.jwt_ttl)?;
        let request_timeout = self.config.request_timeout;

        #[cfg(feature = "tracing")]
        tracing::debug!(timeout_ms = request_timeout.as_millis() as u64, "exchanging IAM assertion");

        let response =
            tokio::time::timeout(request_timeout, self.exchange.create_token(CreateTokenRequest::new(jwt)))
                .await
                .map_err(|_| {
                    Error::timeout(format!(
                        "IAM token exchange did not complete within {}ms",
                        request_timeout.as_millis()
                    ))
                })?
                .inspect_err(|_e| {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_e, "IAM token exchange failed");
                })?;

        if response.iam_token.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!("IAM exchange returned an empty token");
            return Err(Error::empty_token());
        }

        let token: Arc<str> = Arc::from(response.iam_token);
        *self.cache.write() = Some(CachedToken {
            token: Arc::clone(&token),
            acquired_at: self.clock.now(),
        });

        #[cfg(feature = "tracing")]
        tracing::debug!("IAM token refreshed");

        Ok(token)
    }
}

/// Authenticates as a service account.
///
/// Each refresh signs a fresh PS256 assertion, trades it for an IAM token
/// through a [`TokenExchange`] and caches the result. A cached token is
/// reused while no more than `token_ttl` (120s by default) has passed since
/// it was obtained.
///
/// - The exchange is bounded by `request_timeout` (10s by default) and fails
///   with [`ErrorKind::Timeout`](crate::ErrorKind::Timeout)
/// - An empty token fails with [`ErrorKind::EmptyToken`](crate::ErrorKind::EmptyToken)
///   and is not cached
/// - A refresh keeps running when its caller is dropped, so the token it
///   obtains still lands in the cache
/// - Concurrent callers that find no fresh token each start their own refresh
///
/// Refreshes run on the tokio runtime.
///
/// ## Example
///
/// ```rust,ignore
/// use ydb_auth::{AuthService, IamAuthService, IamCredentials, DEFAULT_IAM_ENDPOINT};
///
/// let credentials =
///     IamCredentials::from_authorized_key_file("authorized_key.json", DEFAULT_IAM_ENDPOINT)?;
/// let service = IamAuthService::new(credentials)?;
///
/// let metadata = service.auth_metadata().await?;
/// ```
#[derive(Clone)]
pub struct IamAuthService {
    inner: Arc<Inner>,
}

impl IamAuthService {
    /// Creates a service with the default exchange, clock and timing.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the private key cannot be parsed or
    /// no default exchange is available.
    pub fn new(credentials: IamCredentials) -> Result<Self, Error> {
        Self::builder(credentials).build()
    }

    /// Starts building a service for `credentials`.
    pub fn builder(credentials: IamCredentials) -> IamAuthServiceBuilder {
        IamAuthServiceBuilder {
            credentials,
            exchange: None,
            clock: None,
            config: IamConfig::default(),
        }
    }

    /// Returns the freshness of the cached token.
    pub fn token_state(&self) -> TokenState {
        self.inner.state()
    }

    /// Returns the timing configuration.
    pub fn config(&self) -> &IamConfig {
        &self.inner.config
    }
}

impl AuthService for IamAuthService {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        Box::pin(async move {
            if let Some(token) = self.inner.fresh_token() {
                return Ok(AuthMetadata::with_ticket(token));
            }

            let inner = Arc::clone(&self.inner);
            let token = tokio::spawn(async move { inner.refresh().await })
                .await
                .map_err(|e| {
                    Error::internal(format!("IAM token refresh task failed: {}", e)).with_source(e)
                })??;

            Ok(AuthMetadata::with_ticket(token))
        })
    }
}

impl fmt::Debug for IamAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthService")
            .field("signer", &self.inner.signer)
            .field("config", &self.inner.config)
            .field("token_state", &self.token_state())
            .finish_non_exhaustive()
    }
}

/// Builder for [`IamAuthService`].
#[must_use = "builders do nothing until .build() is called"]
pub struct IamAuthServiceBuilder {
    credentials: IamCredentials,
    exchange: Option<Arc<dyn TokenExchange>>,
    clock: Option<Arc<dyn Clock>>,
    config: IamConfig,
}

impl IamAuthServiceBuilder {
    /// Uses `exchange` instead of the default gRPC exchange.
    pub fn exchange(mut self, exchange: impl TokenExchange + 'static) -> Self {
        self.exchange = Some(Arc::new(exchange));
        self
    }

    /// Uses `clock` for expiry and assertion timestamps.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Overrides the timing configuration.
    pub fn config(mut self, config: IamConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the service.
    ///
    /// Without an explicit exchange, connects lazily to the credentials'
    /// `iam_endpoint` over gRPC; this must run inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the private key cannot be parsed,
    /// the endpoint is invalid, no exchange is available, or the default
    /// exchange is built outside a tokio runtime.
    pub fn build(self) -> Result<IamAuthService, Error> {
        let credentials = self.credentials;
        let signer = AssertionSigner::from_pem(
            &credentials.private_key,
            credentials.access_key_id.as_str(),
            credentials.service_account_id.as_str(),
        )?;

        let exchange = match self.exchange {
            Some(exchange) => exchange,
            None => default_exchange(&credentials.iam_endpoint)?,
        };

        Ok(IamAuthService {
            inner: Arc::new(Inner {
                signer,
                exchange,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                config: self.config,
                cache: RwLock::new(None),
            }),
        })
    }
}

#[cfg(feature = "grpc")]
fn default_exchange(endpoint: &str) -> Result<Arc<dyn TokenExchange>, Error> {
    Ok(Arc::new(crate::exchange::GrpcTokenExchange::connect_lazy(endpoint)?))
}

#[cfg(not(feature = "grpc"))]
fn default_exchange(_endpoint: &str) -> Result<Arc<dyn TokenExchange>, Error> {
    Err(Error::configuration(
        "no default IAM exchange without the `grpc` feature; set one with IamAuthServiceBuilder::exchange",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use jsonwebtoken::{Algorithm, DecodingKey, Validation};

    use super::*;
    use crate::ErrorKind;
    use crate::auth::jwt::{AssertionClaims, IAM_TOKEN_AUDIENCE};
    use crate::testing::{ManualClock, MockTokenExchange};

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/service_account_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/service_account_key.pub.pem");

    fn credentials() -> IamCredentials {
        IamCredentials::new("ajeaccount", "ajekey", PRIVATE_KEY.as_bytes().to_vec(), "unused:443")
    }

    fn service(exchange: &MockTokenExchange, clock: &ManualClock) -> IamAuthService {
        IamAuthService::builder(credentials())
            .exchange(exchange.clone())
            .clock(clock.clone())
            .build()
            .unwrap()
    }

    async fn ticket(service: &IamAuthService) -> String {
        service.auth_metadata().await.unwrap().ticket().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_token_cached_within_window() {
        let exchange = MockTokenExchange::new().then_token("A").always_token("B");
        let clock = ManualClock::starting_now();
        let service = service(&exchange, &clock);

        assert_eq!(service.token_state(), TokenState::Missing);
        assert_eq!(ticket(&service).await, "A");
        assert_eq!(service.token_state(), TokenState::Fresh);

        clock.advance(Duration::from_secs(60));
        assert_eq!(ticket(&service).await, "A");

        clock.advance(Duration::from_secs(60));
        assert_eq!(ticket(&service).await, "A");
        assert_eq!(exchange.call_count(), 1);
    }

    #[tokio::test]
    async fn test_token_refreshed_after_window() {
        let exchange = MockTokenExchange::new().then_token("A").then_token("B");
        let clock = ManualClock::starting_now();
        let service = service(&exchange, &clock);

        assert_eq!(ticket(&service).await, "A");
        clock.advance(Duration::from_millis(120_001));
        assert_eq!(service.token_state(), TokenState::Expired);

        assert_eq!(ticket(&service).await, "B");
        assert_eq!(exchange.call_count(), 2);
        assert_eq!(service.token_state(), TokenState::Fresh);
    }

    #[tokio::test]
    async fn test_empty_token_not_cached() {
        let exchange = MockTokenExchange::new().then_token("").then_token("A");
        let clock = ManualClock::starting_now();
        let service = service(&exchange, &clock);

        let err = service.auth_metadata().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyToken);
        assert_eq!(service.token_state(), TokenState::Missing);

        assert_eq!(ticket(&service).await, "A");
        assert_eq!(exchange.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exchange_error_propagates() {
        let exchange = MockTokenExchange::new().then_error(ErrorKind::Unauthorized, "key revoked");
        let clock = ManualClock::starting_now();
        let service = service(&exchange, &clock);

        let err = service.auth_metadata().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.message(), "key revoked");
        assert_eq!(service.token_state(), TokenState::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_exchange_times_out() {
        let exchange = MockTokenExchange::new().then_hang();
        let service = service(&exchange, &ManualClock::starting_now());

        let start = tokio::time::Instant::now();
        let err = service.auth_metadata().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert!(start.elapsed() < Duration::from_secs(11));
        assert_eq!(service.token_state(), TokenState::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_timeout() {
        let exchange = MockTokenExchange::new().then_delayed_token(Duration::from_secs(5), "late");
        let service = IamAuthService::builder(credentials())
            .exchange(exchange)
            .clock(ManualClock::starting_now())
            .config(IamConfig::builder().request_timeout(Duration::from_secs(2)).build())
            .build()
            .unwrap();

        let err = service.auth_metadata().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_each_refresh() {
        let exchange = MockTokenExchange::new()
            .then_delayed_token(Duration::from_millis(100), "A")
            .then_delayed_token(Duration::from_millis(100), "B");
        let service = service(&exchange, &ManualClock::starting_now());

        let (first, second) = tokio::join!(service.auth_metadata(), service.auth_metadata());
        let mut tickets = vec![
            first.unwrap().ticket().unwrap().to_string(),
            second.unwrap().ticket().unwrap().to_string(),
        ];
        tickets.sort();

        assert_eq!(tickets, vec!["A", "B"]);
        assert_eq!(exchange.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_caller_still_caches() {
        let exchange = MockTokenExchange::new().then_delayed_token(Duration::from_secs(5), "A");
        let service = service(&exchange, &ManualClock::starting_now());

        let abandoned = tokio::time::timeout(Duration::from_secs(1), service.auth_metadata()).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(exchange.completed_count(), 1);
        assert_eq!(service.token_state(), TokenState::Fresh);

        assert_eq!(ticket(&service).await, "A");
        assert_eq!(exchange.call_count(), 1);
    }

    #[tokio::test]
    async fn test_assertion_contents() {
        let exchange = MockTokenExchange::new().always_token("A");
        let clock = ManualClock::starting_now();
        let service = service(&exchange, &clock);
        ticket(&service).await;

        let jwt = &exchange.requests()[0].jwt;
        let header = jsonwebtoken::decode_header(jwt).unwrap();
        assert_eq!(header.alg, Algorithm::PS256);
        assert_eq!(header.kid.as_deref(), Some("ajekey"));

        let mut validation = Validation::new(Algorithm::PS256);
        validation.set_audience(&[IAM_TOKEN_AUDIENCE]);
        let claims = jsonwebtoken::decode::<AssertionClaims>(
            jwt,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.iss, "ajeaccount");
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_bad_key_rejected_at_build() {
        let credentials = IamCredentials::new("sa", "key", b"garbage".to_vec(), "unused:443");
        let err = IamAuthService::builder(credentials)
            .exchange(MockTokenExchange::new())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_hides_token() {
        let service = service(&MockTokenExchange::new(), &ManualClock::starting_now());
        let debug = format!("{:?}", service);
        assert!(debug.contains("IamAuthService"));
        assert!(debug.contains("Missing"));
        assert!(!debug.contains("PRIVATE"));
    }
}
