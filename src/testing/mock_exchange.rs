//! MockTokenExchange for testing IAM token refresh.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::exchange::{CreateTokenRequest, CreateTokenResponse, ExchangeFuture, TokenExchange};
use crate::{Error, ErrorKind};

#[derive(Debug, Clone)]
enum Reply {
    Token(String),
    Delayed(Duration, String),
    Failure(ErrorKind, String),
    Hang,
}

#[derive(Default)]
struct State {
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Option<Reply>>,
    requests: Mutex<Vec<CreateTokenRequest>>,
    completed: AtomicUsize,
}

/// A scripted token exchange.
///
/// Replies queued with the `then_*` methods are used once each, in order.
/// After the queue drains, the reply set with `always_token` repeats. With
/// neither, calls fail with an internal error. Clones share state, so keep
/// one to inspect requests after handing another to the service.
///
/// ## Example
///
/// ```rust
/// use ydb_auth::testing::MockTokenExchange;
///
/// let exchange = MockTokenExchange::new()
///     .then_token("A")
///     .always_token("B");
///
/// assert_eq!(exchange.call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockTokenExchange {
    state: Arc<State>,
}

impl MockTokenExchange {
    /// Creates an exchange with no replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn then_token(self, token: impl Into<String>) -> Self {
        self.push(Reply::Token(token.into()))
    }

    /// Queues a reply delivered after `delay` on the tokio timer.
    #[must_use]
    pub fn then_delayed_token(self, delay: Duration, token: impl Into<String>) -> Self {
        self.push(Reply::Delayed(delay, token.into()))
    }

    /// Queues a failure.
    #[must_use]
    pub fn then_error(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.push(Reply::Failure(kind, message.into()))
    }

    /// Queues a call that never completes.
    #[must_use]
    pub fn then_hang(self) -> Self {
        self.push(Reply::Hang)
    }

    /// Sets the reply used once the queue is empty.
    #[must_use]
    pub fn always_token(self, token: impl Into<String>) -> Self {
        *self.state.fallback.lock() = Some(Reply::Token(token.into()));
        self
    }

    /// Returns the number of exchange calls made.
    pub fn call_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Returns the number of calls that produced a reply.
    pub fn completed_count(&self) -> usize {
        self.state.completed.load(Ordering::SeqCst)
    }

    /// Returns every request received, oldest first.
    pub fn requests(&self) -> Vec<CreateTokenRequest> {
        self.state.requests.lock().clone()
    }

    fn push(self, reply: Reply) -> Self {
        self.state.script.lock().push_back(reply);
        self
    }

    fn next_reply(&self) -> Option<Reply> {
        let scripted = self.state.script.lock().pop_front();
        scripted.or_else(|| self.state.fallback.lock().clone())
    }
}

impl TokenExchange for MockTokenExchange {
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_> {
        self.state.requests.lock().push(request);
        let reply = self.next_reply();
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let result = match reply {
                Some(Reply::Token(token)) => Ok(CreateTokenResponse::new(token)),
                Some(Reply::Delayed(delay, token)) => {
                    tokio::time::sleep(delay).await;
                    Ok(CreateTokenResponse::new(token))
                }
                Some(Reply::Failure(kind, message)) => Err(Error::new(kind, message)),
                Some(Reply::Hang) => std::future::pending().await,
                None => Err(Error::internal("MockTokenExchange has no reply configured")),
            };
            state.completed.fetch_add(1, Ordering::SeqCst);
            result
        })
    }
}
