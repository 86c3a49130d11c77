//! Error kind enumeration for categorizing credential errors.

/// Categorization of credential errors.
///
/// Callers match on the kind to decide whether the enclosing operation
/// should fail or be retried. This crate itself never retries anything
/// except the bounded legacy metadata poll.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind           | Retriable | Typical cause                          |
/// |---------------------|-----------|----------------------------------------|
/// | `Timeout`           | Yes       | IAM exchange exceeded its bound        |
/// | `Unavailable`       | Yes       | IAM or metadata service down           |
/// | `Connection`        | Yes       | DNS, TLS handshake, refused connection |
/// | `RateLimited`       | Yes       | Exchange endpoint throttling           |
/// | `EmptyToken`        | No        | Exchange succeeded without a token     |
/// | `MetadataExhausted` | No        | Legacy poll ran out of attempts        |
/// | `Unauthorized`      | No        | Rejected assertion or key              |
/// | `Configuration`     | No        | Bad key, endpoint or header value      |
/// | `Signing`           | No        | JWT could not be signed                |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The exchange endpoint answered, but the token field was empty.
    #[error("empty token")]
    EmptyToken,

    /// The legacy metadata provider never produced a token.
    #[error("metadata token exhausted")]
    MetadataExhausted,

    /// The assertion could not be signed with the configured key.
    #[error("signing error")]
    Signing,

    /// Authentication failed (assertion rejected, key revoked).
    ///
    /// HTTP: 401 Unauthorized
    /// gRPC: UNAUTHENTICATED
    #[error("unauthorized")]
    Unauthorized,

    /// The service account lacks permission to obtain a token.
    ///
    /// HTTP: 403 Forbidden
    /// gRPC: PERMISSION_DENIED
    #[error("forbidden")]
    Forbidden,

    /// Requested resource was not found.
    ///
    /// HTTP: 404 Not Found
    /// gRPC: NOT_FOUND
    #[error("not found")]
    NotFound,

    /// Invalid request argument or payload.
    ///
    /// HTTP: 400 Bad Request
    /// gRPC: INVALID_ARGUMENT, FAILED_PRECONDITION, OUT_OF_RANGE
    #[error("invalid argument")]
    InvalidArgument,

    /// Rate limit exceeded.
    ///
    /// HTTP: 429 Too Many Requests
    /// gRPC: RESOURCE_EXHAUSTED
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    ///
    /// HTTP: 503 Service Unavailable
    /// gRPC: UNAVAILABLE
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out.
    ///
    /// HTTP: 504 Gateway Timeout or client-side timeout
    /// gRPC: DEADLINE_EXCEEDED
    #[error("timeout")]
    Timeout,

    /// Internal server error.
    ///
    /// HTTP: 500 Internal Server Error
    /// gRPC: INTERNAL, DATA_LOSS
    #[error("internal error")]
    Internal,

    /// Request was cancelled.
    ///
    /// gRPC: CANCELLED
    #[error("cancelled")]
    Cancelled,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// Protocol error (unexpected status, unimplemented method).
    #[error("protocol error")]
    Protocol,

    /// Configuration error (invalid key, endpoint or header value).
    #[error("configuration error")]
    Configuration,

    /// Conflict with existing state.
    ///
    /// HTTP: 409 Conflict
    /// gRPC: ALREADY_EXISTS, ABORTED
    #[error("conflict")]
    Conflict,

    /// Generic transport failure that fits no narrower kind.
    #[error("transport error")]
    Transport,

    /// Response could not be parsed or was malformed.
    #[error("invalid response")]
    InvalidResponse,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ydb_auth::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_retriable());
    /// assert!(!ErrorKind::EmptyToken.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
        )
    }

    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            499 => ErrorKind::Cancelled,
            500 => ErrorKind::Internal,
            502 => ErrorKind::Protocol,
            503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if (400..500).contains(&status) => ErrorKind::InvalidArgument,
            _ if status >= 500 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        }
    }

    /// Creates an `ErrorKind` from a gRPC status code.
    #[cfg(feature = "grpc")]
    pub fn from_grpc_code(code: tonic::Code) -> Self {
        use tonic::Code;
        match code {
            Code::Ok => ErrorKind::Unknown,
            Code::Cancelled => ErrorKind::Cancelled,
            Code::Unknown => ErrorKind::Unknown,
            Code::InvalidArgument => ErrorKind::InvalidArgument,
            Code::DeadlineExceeded => ErrorKind::Timeout,
            Code::NotFound => ErrorKind::NotFound,
            Code::AlreadyExists => ErrorKind::Conflict,
            Code::PermissionDenied => ErrorKind::Forbidden,
            Code::ResourceExhausted => ErrorKind::RateLimited,
            Code::FailedPrecondition => ErrorKind::InvalidArgument,
            Code::Aborted => ErrorKind::Conflict,
            Code::OutOfRange => ErrorKind::InvalidArgument,
            Code::Unimplemented => ErrorKind::Protocol,
            Code::Internal => ErrorKind::Internal,
            Code::Unavailable => ErrorKind::Unavailable,
            Code::DataLoss => ErrorKind::Internal,
            Code::Unauthenticated => ErrorKind::Unauthorized,
        }
    }
}
