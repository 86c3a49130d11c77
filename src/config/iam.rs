//! IAM token exchange timing.

use std::time::Duration;

/// Lifetime written into the signed assertion.
pub const DEFAULT_JWT_TTL: Duration = Duration::from_secs(3600);

/// How long an exchanged IAM token is reused before asking again.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(120);

/// Upper bound on a single exchange call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timing for [`IamAuthService`](crate::auth::IamAuthService).
///
/// The cached token window is deliberately much shorter than the assertion
/// lifetime: assertions are signed locally, so the service re-validates
/// against IAM every couple of minutes.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::IamConfig;
/// use std::time::Duration;
///
/// let config = IamConfig::builder()
///     .token_ttl(Duration::from_secs(60))
///     .build();
///
/// assert_eq!(config.jwt_ttl, Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct IamConfig {
    /// `exp - iat` of each signed assertion.
    #[builder(default = DEFAULT_JWT_TTL)]
    pub jwt_ttl: Duration,

    /// How long a token is considered fresh after it was obtained.
    #[builder(default = DEFAULT_TOKEN_TTL)]
    pub token_ttl: Duration,

    /// Timeout for one exchange call.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Default for IamConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
