//! No authentication.

use super::{AuthFuture, AuthMetadata, AuthService};

/// Sends calls without credentials.
///
/// Always succeeds with an attachment that has no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuthService;

impl AnonymousAuthService {
    /// Creates the anonymous strategy.
    pub fn new() -> Self {
        Self
    }
}

impl AuthService for AnonymousAuthService {
    fn auth_metadata(&self) -> AuthFuture<'_> {
        Box::pin(async { Ok(AuthMetadata::empty()) })
    }
}
