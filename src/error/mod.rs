//! Error types for credential operations.
//!
//! Every auth service returns [`Error`]; match on [`Error::kind`] to tell
//! the failure modes apart:
//!
//! - [`ErrorKind::EmptyToken`]: the IAM exchange answered without a token
//! - [`ErrorKind::Timeout`]: the IAM exchange exceeded its bound
//! - [`ErrorKind::MetadataExhausted`]: the legacy metadata poll gave up
//!
//! Errors raised by a user-supplied token provider pass through unchanged.

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for credential operations.
pub type Result<T> = std::result::Result<T, Error>;
