//! Instance metadata service settings.

use std::time::Duration;

/// Token endpoint of the instance metadata service.
pub const DEFAULT_METADATA_URL: &str =
    "http://169.254.169.254/computeMetadata/v1/instance/service-accounts/default/token";

/// Settings for [`MetadataTokenService`](crate::auth::MetadataTokenService).
///
/// ## Example
///
/// ```rust
/// use ydb_auth::MetadataServiceConfig;
/// use std::time::Duration;
///
/// let config = MetadataServiceConfig::builder()
///     .url("http://127.0.0.1:8080/token")
///     .refresh_margin(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(config.url, "http://127.0.0.1:8080/token");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct MetadataServiceConfig {
    /// Full URL of the token endpoint.
    #[builder(into, default = DEFAULT_METADATA_URL.to_string())]
    pub url: String,

    /// Timeout for one metadata request.
    #[builder(default = Duration::from_secs(10))]
    pub request_timeout: Duration,

    /// A cached token is refetched this long before it expires.
    #[builder(default = Duration::from_secs(60))]
    pub refresh_margin: Duration,
}

impl Default for MetadataServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
