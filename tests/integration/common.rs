//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use ydb_auth::IamCredentials;

/// PKCS#8 RSA key used to sign assertions in tests.
pub const PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");

/// Public half of [`PRIVATE_KEY`].
pub const PUBLIC_KEY: &str = include_str!("../fixtures/service_account_key.pub.pem");

pub const SERVICE_ACCOUNT_ID: &str = "ajeintegration";
pub const ACCESS_KEY_ID: &str = "ajekeyintegration";

/// Installs a test log subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Credentials over the fixture key.
pub fn credentials(iam_endpoint: &str) -> IamCredentials {
    IamCredentials::new(
        SERVICE_ACCOUNT_ID,
        ACCESS_KEY_ID,
        PRIVATE_KEY.as_bytes().to_vec(),
        iam_endpoint,
    )
}

/// An authorized key file on disk, removed on drop.
pub struct AuthorizedKeyFile {
    pub path: PathBuf,
}

impl AuthorizedKeyFile {
    pub fn write() -> Result<Self> {
        let path = std::env::temp_dir().join(format!("authorized_key_{}.json", uuid::Uuid::new_v4()));
        let json = serde_json::json!({
            "id": ACCESS_KEY_ID,
            "service_account_id": SERVICE_ACCOUNT_ID,
            "private_key": PRIVATE_KEY,
        });
        std::fs::write(&path, json.to_string())
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(Self { path })
    }
}

impl Drop for AuthorizedKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
