//! Integration tests for ydb-auth.
//!
//! Every test runs against in-process doubles (wiremock servers, scripted
//! exchanges, paused tokio time); no YDB or IAM deployment is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With logs
//! RUST_LOG=ydb_auth=debug cargo test --features tracing --test integration -- --nocapture
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod attachment_tests;
mod common;
mod iam_tests;
mod metadata_tests;
