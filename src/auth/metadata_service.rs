//! Token provider backed by the instance metadata HTTP endpoint.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use url::Url;

use super::{TokenFuture, TokenProvider};
use crate::config::MetadataServiceConfig;
use crate::time::{Clock, SystemClock};
use crate::{Error, ErrorKind};

const METADATA_FLAVOR: &str = "Metadata-Flavor";

#[derive(Deserialize)]
struct MetadataTokenReply {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

struct CachedToken {
    token: String,
    refresh_at: DateTime<Utc>,
}

/// Fetches tokens from the metadata service of the VM the process runs on.
///
/// Sends `GET` with `Metadata-Flavor: Google` and reads
/// `{"access_token", "expires_in"}`. The token is reused until
/// `expires_in - refresh_margin` has elapsed.
pub struct MetadataTokenService {
    url: Url,
    http_client: reqwest::Client,
    clock: Arc<dyn Clock>,
    config: MetadataServiceConfig,
    cache: RwLock<Option<CachedToken>>,
}

impl MetadataTokenService {
    /// Creates a provider for the default metadata URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(MetadataServiceConfig::default())
    }

    /// Creates a provider with custom settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is invalid or the HTTP
    /// client cannot be built.
    pub fn with_config(config: MetadataServiceConfig) -> Result<Self, Error> {
        let url = Url::parse(&config.url)?;

        let mut headers = HeaderMap::new();
        headers.insert(METADATA_FLAVOR, HeaderValue::from_static("Google"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(crate::user_agent::user_agent())
                .map_err(|e| Error::configuration(format!("invalid user agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url,
            http_client,
            clock: Arc::new(SystemClock),
            config,
            cache: RwLock::new(None),
        })
    }

    /// Uses `clock` to decide when the cached token must be refreshed.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the settings.
    pub fn config(&self) -> &MetadataServiceConfig {
        &self.config
    }

    fn cached(&self) -> Option<String> {
        let cache = self.cache.read();
        let cached = cache.as_ref()?;
        (self.clock.now() < cached.refresh_at).then(|| cached.token.clone())
    }

    async fn fetch(&self) -> Result<String, Error> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %self.url, "fetching token from metadata service");

        let response = self.http_client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::new(
                ErrorKind::from_http_status(status.as_u16()),
                format!("metadata service returned HTTP {}: {}", status.as_u16(), body),
            ));
        }

        let bytes = response.bytes().await?;
        let reply: MetadataTokenReply = serde_json::from_slice(&bytes)?;
        if reply.access_token.is_empty() {
            return Err(Error::empty_token());
        }

        let lifetime = i64::try_from(reply.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let margin = TimeDelta::from_std(self.config.refresh_margin).unwrap_or(TimeDelta::MAX);
        let refresh_at = self
            .clock
            .now()
            .checked_add_signed(lifetime.checked_sub(&margin).unwrap_or(TimeDelta::zero()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        *self.cache.write() = Some(CachedToken {
            token: reply.access_token.clone(),
            refresh_at,
        });

        Ok(reply.access_token)
    }
}

impl TokenProvider for MetadataTokenService {
    fn fetch_token(&self) -> TokenFuture<'_> {
        Box::pin(self.fetch())
    }
}

impl fmt::Debug for MetadataTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataTokenService")
            .field("url", &self.url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
