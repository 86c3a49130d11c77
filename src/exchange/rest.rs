//! REST token exchange using reqwest.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

use super::traits::{CreateTokenRequest, CreateTokenResponse, ExchangeFuture, TokenExchange};
use crate::{Error, ErrorKind};

/// Default base URL of the IAM REST API.
pub const DEFAULT_IAM_REST_URL: &str = "https://iam.api.cloud.yandex.net";

const TOKENS_PATH: &str = "iam/v1/tokens";

#[derive(Serialize)]
struct CreateTokenBody<'a> {
    jwt: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenReply {
    #[serde(default)]
    iam_token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Exchanges assertions with `POST {base}/iam/v1/tokens`.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::exchange::RestTokenExchange;
///
/// let exchange = RestTokenExchange::new("https://iam.api.cloud.yandex.net")?;
/// # Ok::<(), ydb_auth::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RestTokenExchange {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl RestTokenExchange {
    /// Creates an exchange against the given IAM base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(TOKENS_PATH)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(crate::user_agent::user_agent())
                .map_err(|e| Error::configuration(format!("invalid user agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    /// Returns the full token endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TokenExchange for RestTokenExchange {
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_> {
        Box::pin(async move {
            let request_id = uuid::Uuid::new_v4().to_string();

            let response = self
                .http_client
                .post(self.endpoint.clone())
                .header("x-request-id", request_id.as_str())
                .json(&CreateTokenBody { jwt: &request.jwt })
                .send()
                .await
                .map_err(|e| Error::from(e).with_request_id(request_id.clone()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::new(
                    ErrorKind::from_http_status(status.as_u16()),
                    format!("IAM token request failed with HTTP {}: {}", status.as_u16(), body),
                )
                .with_request_id(request_id));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::from(e).with_request_id(request_id.clone()))?;
            let reply: CreateTokenReply = serde_json::from_slice(&bytes)
                .map_err(|e| Error::from(e).with_request_id(request_id))?;

            Ok(CreateTokenResponse {
                iam_token: reply.iam_token,
                expires_at: reply.expires_at,
            })
        })
    }
}
