//! Service account flow end to end: signing, exchange, caching, expiry.

#![cfg(feature = "rest")]

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use ydb_auth::auth::{AssertionClaims, IAM_TOKEN_AUDIENCE};
use ydb_auth::exchange::RestTokenExchange;
use ydb_auth::testing::{ManualClock, MockTokenExchange};
use ydb_auth::time::Clock;
use ydb_auth::{
    AuthService, ErrorKind, IamAuthService, IamConfig, IamCredentials, TokenState,
};

use crate::common::{self, ACCESS_KEY_ID, PUBLIC_KEY, SERVICE_ACCOUNT_ID};

#[derive(Deserialize)]
struct ExchangeBody {
    jwt: String,
}

fn iam_token_reply(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "iamToken": token,
        "expiresAt": "2099-01-01T00:00:00Z",
    }))
}

async fn rest_service(server: &MockServer, clock: &ManualClock) -> IamAuthService {
    IamAuthService::builder(common::credentials("unused:443"))
        .exchange(RestTokenExchange::new(&server.uri()).unwrap())
        .clock(clock.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_first_call_exchanges_signed_assertion() {
    common::init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/iam/v1/tokens"))
        .and(header_exists("x-request-id"))
        .and(header_exists("user-agent"))
        .respond_with(iam_token_reply("t1.first"))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::starting_now();
    let service = rest_service(&server, &clock).await;
    let metadata = service.auth_metadata().await.unwrap();
    assert_eq!(metadata.ticket(), Some("t1.first"));

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    let body: ExchangeBody = serde_json::from_slice(&requests[0].body).unwrap();

    let header = jsonwebtoken::decode_header(&body.jwt).unwrap();
    assert_eq!(header.alg, Algorithm::PS256);
    assert_eq!(header.kid.as_deref(), Some(ACCESS_KEY_ID));

    let mut validation = Validation::new(Algorithm::PS256);
    validation.set_audience(&[IAM_TOKEN_AUDIENCE]);
    validation.set_issuer(&[SERVICE_ACCOUNT_ID]);
    let claims = jsonwebtoken::decode::<AssertionClaims>(
        &body.jwt,
        &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .unwrap()
    .claims;

    assert_eq!(claims.iat, clock.now().timestamp());
    assert_eq!(claims.exp, claims.iat + 3600);
}

#[tokio::test]
async fn test_cached_token_reused_then_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(iam_token_reply("t1.cached"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(iam_token_reply("t1.refreshed"))
        .mount(&server)
        .await;

    let clock = ManualClock::starting_now();
    let service = rest_service(&server, &clock).await;

    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.cached"));
    clock.advance(Duration::from_secs(120));
    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.cached"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    clock.advance(Duration::from_millis(1));
    assert_eq!(service.token_state(), TokenState::Expired);
    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.refreshed"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_token_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(iam_token_reply(""))
        .mount(&server)
        .await;

    let service = rest_service(&server, &ManualClock::starting_now()).await;
    let err = service.auth_metadata().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyToken);
    assert_eq!(service.token_state(), TokenState::Missing);
}

#[tokio::test]
async fn test_server_rejection_surfaces_with_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("service account is disabled"))
        .mount(&server)
        .await;

    let service = rest_service(&server, &ManualClock::starting_now()).await;
    let err = service.auth_metadata().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(err.message().contains("service account is disabled"));
    assert!(err.request_id().is_some());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(iam_token_reply("t1.late").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let service = IamAuthService::builder(common::credentials("unused:443"))
        .exchange(RestTokenExchange::new(&server.uri()).unwrap())
        .config(IamConfig::builder().request_timeout(Duration::from_millis(200)).build())
        .build()
        .unwrap();

    let err = service.auth_metadata().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test(start_paused = true)]
async fn test_default_timeout_is_ten_seconds() {
    let service = IamAuthService::builder(common::credentials("unused:443"))
        .exchange(MockTokenExchange::new().then_hang().always_token("t1.after"))
        .build()
        .unwrap();

    let start = tokio::time::Instant::now();
    let err = service.auth_metadata().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(start.elapsed() >= Duration::from_secs(10));

    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.after"));
}

#[tokio::test]
async fn test_credentials_from_authorized_key_file() {
    let key_file = common::AuthorizedKeyFile::write().unwrap();
    let credentials = IamCredentials::from_authorized_key_file(&key_file.path, "unused:443").unwrap();
    assert_eq!(credentials.service_account_id, SERVICE_ACCOUNT_ID);
    assert_eq!(credentials.access_key_id, ACCESS_KEY_ID);

    let service = IamAuthService::builder(credentials)
        .exchange(MockTokenExchange::new().always_token("t1.from-file"))
        .build()
        .unwrap();
    assert_eq!(service.auth_metadata().await.unwrap().ticket(), Some("t1.from-file"));
}

#[cfg(feature = "grpc")]
#[tokio::test]
async fn test_default_exchange_builds_lazily() {
    let service = IamAuthService::new(common::credentials("127.0.0.1:1")).unwrap();
    assert_eq!(service.token_state(), TokenState::Missing);
}
