//! What each strategy attaches to an outgoing call.

use std::sync::Arc;

use ydb_auth::{
    AUTH_TICKET_HEADER, AnonymousAuthService, AuthService, Credentials, TokenAuthService,
};

#[tokio::test]
async fn test_static_token_attached_under_ticket_header() {
    let service = TokenAuthService::new("t1.static-token");

    for _ in 0..3 {
        let metadata = service.auth_metadata().await.unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get(AUTH_TICKET_HEADER), Some("t1.static-token"));
    }
}

#[tokio::test]
async fn test_anonymous_attaches_nothing() {
    let metadata = AnonymousAuthService::new().auth_metadata().await.unwrap();
    assert!(metadata.is_empty());
    assert_eq!(metadata.iter().count(), 0);
}

#[tokio::test]
async fn test_strategies_behind_one_trait_object() {
    let services: Vec<Arc<dyn AuthService>> = vec![
        Credentials::Anonymous.into_auth_service().unwrap(),
        Credentials::Token("t1.token".into()).into_auth_service().unwrap(),
    ];

    let tickets: Vec<Option<String>> = futures::future::join_all(
        services.iter().map(|service| service.auth_metadata()),
    )
    .await
    .into_iter()
    .map(|result| result.unwrap().ticket().map(str::to_string))
    .collect();

    assert_eq!(tickets, vec![None, Some("t1.token".to_string())]);
}

#[cfg(feature = "grpc")]
#[tokio::test]
async fn test_attach_to_tonic_request() {
    let metadata = TokenAuthService::new("t1.grpc").auth_metadata().await.unwrap();
    let mut request = tonic::Request::new(());
    metadata.apply_to_request(&mut request).unwrap();

    let value = request.metadata().get(AUTH_TICKET_HEADER).unwrap();
    assert_eq!(value.to_str().unwrap(), "t1.grpc");
}

#[cfg(feature = "grpc")]
#[tokio::test]
async fn test_anonymous_tonic_request_untouched() {
    let metadata = AnonymousAuthService::new().auth_metadata().await.unwrap();
    let mut request = tonic::Request::new(());
    metadata.apply_to_request(&mut request).unwrap();
    assert!(request.metadata().get(AUTH_TICKET_HEADER).is_none());
}

#[cfg(feature = "rest")]
#[tokio::test]
async fn test_attach_to_reqwest_headers() {
    let metadata = TokenAuthService::new("t1.rest").auth_metadata().await.unwrap();
    let headers = metadata.to_header_map().unwrap();
    assert_eq!(headers.get(AUTH_TICKET_HEADER).unwrap(), "t1.rest");
}
