//! Local-metadata strategy with modern and legacy providers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use ydb_auth::{
    AuthService, Credentials, Error, ErrorKind, InitializeFuture, LegacyTokenProvider,
    MetadataAuthService, RetryConfig, TokenFuture, TokenProvider,
};
use ydb_auth::testing::RecordingSleeper;

/// Stands in for an older SDK that fills its token in the background.
struct WarmingProvider {
    reads: AtomicU32,
    ready_on_read: u32,
    initializer: bool,
    initialized: AtomicU32,
}

impl WarmingProvider {
    fn new(ready_on_read: u32, initializer: bool) -> Arc<Self> {
        Arc::new(Self {
            reads: AtomicU32::new(0),
            ready_on_read,
            initializer,
            initialized: AtomicU32::new(0),
        })
    }

    fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

impl LegacyTokenProvider for WarmingProvider {
    fn token(&self) -> Option<String> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        (read >= self.ready_on_read).then(|| "t1.metadata".to_string())
    }

    fn initialize(&self) -> Option<InitializeFuture<'_>> {
        if !self.initializer {
            return None;
        }
        Some(Box::pin(async move {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
    }
}

#[tokio::test(start_paused = true)]
async fn test_legacy_token_after_two_delays() {
    let provider = WarmingProvider::new(4, true);
    let service = Credentials::LegacyMetadata(provider.clone()).into_auth_service().unwrap();

    let start = tokio::time::Instant::now();
    let metadata = service.auth_metadata().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(metadata.ticket(), Some("t1.metadata"));
    assert_eq!(provider.reads(), 4);
    assert_eq!(provider.initialized.load(Ordering::SeqCst), 1);
    assert!(elapsed >= Duration::from_millis(4000));
    assert!(elapsed < Duration::from_millis(6000));
}

#[tokio::test(start_paused = true)]
async fn test_legacy_exhausted_after_five_retries() {
    let provider = WarmingProvider::new(u32::MAX, false);
    let service = MetadataAuthService::legacy(provider.clone());

    let start = tokio::time::Instant::now();
    let err = service.auth_metadata().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MetadataExhausted);
    assert_eq!(
        err.to_string(),
        "metadata token exhausted: failed to fetch access token via metadata service in 5 tries"
    );
    assert_eq!(provider.reads(), 6);
    assert!(start.elapsed() >= Duration::from_millis(10_000));
}

#[tokio::test]
async fn test_legacy_with_recording_sleeper() {
    let provider = WarmingProvider::new(3, false);
    let sleeper = RecordingSleeper::new();
    let service = MetadataAuthService::legacy_with(
        provider.clone(),
        RetryConfig::default(),
        Arc::new(sleeper.clone()),
    );

    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.metadata"));
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(2000); 2]);
}

#[tokio::test]
async fn test_modern_provider_error_unchanged() {
    struct Offline;
    impl TokenProvider for Offline {
        fn fetch_token(&self) -> TokenFuture<'_> {
            Box::pin(async { Err(Error::connection("connection refused")) })
        }
    }

    let service = Credentials::Metadata(Arc::new(Offline)).into_auth_service().unwrap();
    let err = service.auth_metadata().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert_eq!(err.message(), "connection refused");
}

#[cfg(feature = "rest")]
mod metadata_service {
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use ydb_auth::{MetadataServiceConfig, MetadataTokenService};

    use super::*;

    #[tokio::test]
    async fn test_metadata_service_backs_strategy() {
        crate::common::init_tracing();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "t1.vm",
                "expires_in": 43200,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = MetadataServiceConfig::builder()
            .url(format!("{}/computeMetadata/v1/instance/service-accounts/default/token", server.uri()))
            .build();
        let service = MetadataAuthService::new(MetadataTokenService::with_config(config).unwrap());

        for _ in 0..3 {
            assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.vm"));
        }
    }

    #[test]
    fn test_from_metadata_service_builds() {
        MetadataAuthService::from_metadata_service().unwrap();
    }
}
