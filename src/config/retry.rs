//! Bounded fixed-delay retry configuration.

use std::time::Duration;

/// Default number of extra attempts after the first one fails.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay before each extra attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for polling a token source that may not be ready yet.
///
/// Unlike request retries elsewhere in a client, this policy uses a fixed
/// delay with no backoff or jitter: each extra attempt waits `delay`.
///
/// ## Default Values
///
/// - `max_retries`: 5
/// - `delay`: 2000ms
///
/// ## Example
///
/// ```rust
/// use ydb_auth::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(3)
///     .with_delay(Duration::from_millis(500));
///
/// assert_eq!(config.total_attempts(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts after the first one.
    pub max_retries: u32,

    /// Delay before each extra attempt.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the maximum number of extra attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the fixed delay before each extra attempt.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the first attempt plus all retries.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns `true` if retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }
}
