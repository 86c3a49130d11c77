//! Testing utilities for code that depends on auth services.
//!
//! - [`MockTokenExchange`]: A scripted IAM exchange (tokens, errors, hangs, delays)
//! - [`ManualClock`]: A clock that moves only when advanced
//! - [`RecordingSleeper`]: A sleeper that records delays instead of waiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use ydb_auth::testing::{ManualClock, MockTokenExchange};
//! use ydb_auth::{AuthService, IamAuthService};
//!
//! let clock = ManualClock::starting_now();
//! let exchange = MockTokenExchange::new().then_token("A").always_token("B");
//!
//! let service = IamAuthService::builder(credentials)
//!     .exchange(exchange.clone())
//!     .clock(clock.clone())
//!     .build()?;
//!
//! assert_eq!(service.auth_metadata().await?.ticket(), Some("A"));
//! clock.advance(Duration::from_secs(121));
//! assert_eq!(service.auth_metadata().await?.ticket(), Some("B"));
//! ```

mod mock_exchange;
mod time;

pub use mock_exchange::MockTokenExchange;
pub use time::{ManualClock, RecordingSleeper};
