//! The capability every authentication strategy implements.

use std::{future::Future, pin::Pin, sync::Arc};

use super::AuthMetadata;
use crate::Error;

/// A type alias for the boxed future returned by [`AuthService::auth_metadata`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<AuthMetadata, Error>> + Send + 'a>>;

/// Produces the authentication metadata for one outgoing call.
///
/// The RPC layer calls [`auth_metadata`](AuthService::auth_metadata) once
/// per request and attaches the result. Implementations must tolerate
/// repeated and concurrent calls; the only side effect is an internal
/// token refresh.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn AuthService>`.
///
/// ## Example: Custom Strategy
///
/// ```rust
/// use ydb_auth::{AuthFuture, AuthMetadata, AuthService};
///
/// struct EnvTokenAuth {
///     var: String,
/// }
///
/// impl AuthService for EnvTokenAuth {
///     fn auth_metadata(&self) -> AuthFuture<'_> {
///         Box::pin(async move {
///             let token = std::env::var(&self.var).map_err(|_| {
///                 ydb_auth::Error::configuration(format!("{} is not set", self.var))
///             })?;
///             Ok(AuthMetadata::with_ticket(token))
///         })
///     }
/// }
/// ```
pub trait AuthService: Send + Sync {
    /// Returns the metadata to attach to the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if a token cannot be obtained. The caller decides
    /// whether to fail the enclosing operation.
    fn auth_metadata(&self) -> AuthFuture<'_>;
}

impl<T: AuthService + ?Sized> AuthService for Arc<T> {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        (**self).auth_metadata()
    }
}

impl<T: AuthService + ?Sized> AuthService for Box<T> {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        (**self).auth_metadata()
    }
}
