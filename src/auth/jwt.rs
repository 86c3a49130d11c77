//! PS256 assertion signing for the IAM token exchange.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Audience every assertion is addressed to.
pub const IAM_TOKEN_AUDIENCE: &str = "https://iam.api.cloud.yandex.net/iam/v1/tokens";

/// Claims of the signed assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Service account ID.
    pub iss: String,
    /// Always [`IAM_TOKEN_AUDIENCE`].
    pub aud: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signs assertions with an RSA private key.
///
/// The PEM is decoded once at construction. Key material lives only inside
/// the `jsonwebtoken` key; `Debug` shows the key ID alone.
pub(crate) struct AssertionSigner {
    key: EncodingKey,
    key_id: String,
    issuer: String,
}

impl AssertionSigner {
    /// Prepares a signer from a PEM-encoded RSA private key (PKCS#1 or PKCS#8).
    pub(crate) fn from_pem(
        pem: &[u8],
        key_id: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, Error> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(|e| {
            Error::configuration(format!("failed to parse RSA private key: {}", e)).with_source(e)
        })?;
        Ok(Self {
            key,
            key_id: key_id.into(),
            issuer: issuer.into(),
        })
    }

    /// Builds the claims for an assertion issued at `now`.
    pub(crate) fn claims(&self, now: DateTime<Utc>, ttl: Duration) -> AssertionClaims {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let iat = now.timestamp();
        AssertionClaims {
            iss: self.issuer.clone(),
            aud: IAM_TOKEN_AUDIENCE.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        }
    }

    /// Signs an assertion issued at `now` and valid for `ttl`.
    pub(crate) fn sign(&self, now: DateTime<Utc>, ttl: Duration) -> Result<String, Error> {
        let mut header = Header::new(Algorithm::PS256);
        header.kid = Some(self.key_id.clone());

        jsonwebtoken::encode(&header, &self.claims(now, ttl), &self.key).map_err(|e| {
            Error::signing(format!("failed to sign IAM assertion: {}", e)).with_source(e)
        })
    }
}

impl fmt::Debug for AssertionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionSigner")
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
