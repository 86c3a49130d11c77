//! The credential attachment carried with every call.

use std::fmt;
use std::sync::Arc;

#[cfg(any(feature = "grpc", feature = "rest"))]
use crate::Error;

/// Header key under which the token travels.
pub const AUTH_TICKET_HEADER: &str = "x-ydb-auth-ticket";

/// Authentication metadata to attach to one outgoing call.
///
/// Holds at most one entry, `x-ydb-auth-ticket: <token>`. The anonymous
/// strategy produces an attachment with no entries. A fresh value is built
/// for each call and never mutated afterwards.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::{AuthMetadata, AUTH_TICKET_HEADER};
///
/// let metadata = AuthMetadata::with_ticket("t1.abc");
/// assert_eq!(metadata.get(AUTH_TICKET_HEADER), Some("t1.abc"));
/// assert_eq!(metadata.len(), 1);
///
/// assert!(AuthMetadata::empty().is_empty());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthMetadata {
    ticket: Option<Arc<str>>,
}

impl AuthMetadata {
    /// Creates an attachment with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an attachment carrying `token`.
    pub fn with_ticket(token: impl Into<Arc<str>>) -> Self {
        Self {
            ticket: Some(token.into()),
        }
    }

    /// Returns the token, if any.
    pub fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    /// Looks up an entry by header key.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.eq_ignore_ascii_case(AUTH_TICKET_HEADER) {
            self.ticket()
        } else {
            None
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        usize::from(self.ticket.is_some())
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.ticket.is_none()
    }

    /// Iterates over `(key, value)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.ticket().map(|t| (AUTH_TICKET_HEADER, t)).into_iter()
    }

    /// Converts into gRPC request metadata.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is not a valid ASCII
    /// metadata value.
    #[cfg(feature = "grpc")]
    pub fn to_metadata_map(&self) -> Result<tonic::metadata::MetadataMap, Error> {
        let mut map = tonic::metadata::MetadataMap::new();
        self.insert_into(&mut map)?;
        Ok(map)
    }

    /// Inserts the entries into an outgoing tonic request.
    ///
    /// # Errors
    ///
    /// Same as [`to_metadata_map`](Self::to_metadata_map).
    #[cfg(feature = "grpc")]
    pub fn apply_to_request<T>(&self, request: &mut tonic::Request<T>) -> Result<(), Error> {
        self.insert_into(request.metadata_mut())
    }

    #[cfg(feature = "grpc")]
    fn insert_into(&self, map: &mut tonic::metadata::MetadataMap) -> Result<(), Error> {
        if let Some(token) = self.ticket() {
            let value = tonic::metadata::MetadataValue::try_from(token)
                .map_err(|e| Error::configuration(format!("invalid auth ticket: {}", e)))?;
            map.insert(AUTH_TICKET_HEADER, value);
        }
        Ok(())
    }

    /// Converts into HTTP headers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is not a valid header value.
    #[cfg(feature = "rest")]
    pub fn to_header_map(&self) -> Result<reqwest::header::HeaderMap, Error> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        let mut headers = HeaderMap::new();
        if let Some(token) = self.ticket() {
            let value = HeaderValue::from_str(token)
                .map_err(|e| Error::configuration(format!("invalid auth ticket: {}", e)))?;
            headers.insert(HeaderName::from_static(AUTH_TICKET_HEADER), value);
        }
        Ok(headers)
    }
}

impl fmt::Debug for AuthMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        if self.ticket.is_some() {
            map.entry(&AUTH_TICKET_HEADER, &"[REDACTED]");
        }
        map.finish()
    }
}
