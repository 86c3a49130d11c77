//! Bounded polling driven by a [`RetryConfig`].

use crate::config::RetryConfig;
use crate::time::Sleeper;

/// Re-runs `attempt` until it yields a value or the retries run out.
///
/// `attempt` is called up to `config.max_retries` times, each call preceded
/// by a sleep of `config.delay`. The caller is expected to have made the
/// first attempt already. Returns `None` when every attempt came back empty.
pub(crate) async fn poll<T, F>(config: &RetryConfig, sleeper: &dyn Sleeper, mut attempt: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    for retry in 1..=config.max_retries {
        sleeper.sleep(config.delay).await;

        #[cfg(feature = "tracing")]
        tracing::debug!(retry, max_retries = config.max_retries, "polling token source");
        #[cfg(not(feature = "tracing"))]
        let _ = retry;

        if let Some(value) = attempt() {
            return Some(value);
        }
    }
    None
}
