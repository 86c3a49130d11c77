//! User-Agent header sent to the IAM and metadata endpoints.

use std::sync::OnceLock;

/// Crate name used in the User-Agent string.
const SDK_NAME: &str = env!("CARGO_PKG_NAME");

/// Crate version from Cargo.toml.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cached User-Agent string (computed once on first access).
static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Returns the User-Agent string for outgoing token requests.
///
/// Format: `ydb-auth/0.1.0 (rust/1.92; linux/x86_64)`
pub(crate) fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        format!(
            "{}/{} ({}; {}/{})",
            SDK_NAME,
            SDK_VERSION,
            rust_version(),
            os_name(),
            std::env::consts::ARCH,
        )
    })
}

fn rust_version() -> &'static str {
    concat!("rust/", env!("CARGO_PKG_RUST_VERSION"))
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}
