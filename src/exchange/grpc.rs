//! gRPC token exchange using tonic.
//!
//! Calls `yandex.cloud.iam.v1.IamTokenService/Create` with hand-declared
//! prost messages, so no proto code generation is needed.

use chrono::{DateTime, Utc};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::traits::{CreateTokenRequest, CreateTokenResponse, ExchangeFuture, TokenExchange};
use crate::Error;

const CREATE_TOKEN_PATH: &str = "/yandex.cloud.iam.v1.IamTokenService/Create";

/// Wire messages of the IAM token service.
pub(crate) mod proto {
    /// `CreateIamTokenRequest`; only the `jwt` arm of the identity oneof is used.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateIamTokenRequest {
        #[prost(string, tag = "2")]
        pub jwt: ::prost::alloc::string::String,
    }

    /// `CreateIamTokenResponse`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateIamTokenResponse {
        #[prost(string, tag = "1")]
        pub iam_token: ::prost::alloc::string::String,
        #[prost(message, optional, tag = "2")]
        pub expires_at: ::core::option::Option<::prost_types::Timestamp>,
    }
}

/// Exchanges assertions over a tonic [`Channel`].
///
/// ## Example
///
/// ```rust,ignore
/// use ydb_auth::exchange::GrpcTokenExchange;
///
/// let exchange = GrpcTokenExchange::connect_lazy("iam.api.cloud.yandex.net:443")?;
/// ```
#[derive(Debug, Clone)]
pub struct GrpcTokenExchange {
    channel: Channel,
}

impl GrpcTokenExchange {
    /// Wraps an existing channel. TLS and pooling are the channel's concern.
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Creates a lazily connected channel to `endpoint`.
    ///
    /// `endpoint` may be `host:port` or a full URI. Without a scheme,
    /// `https://` is assumed. HTTPS endpoints use the platform's native roots.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid URI or
    /// no tokio runtime is running.
    pub fn connect_lazy(endpoint: &str) -> Result<Self, Error> {
        tokio::runtime::Handle::try_current().map_err(|e| {
            Error::configuration("IAM gRPC exchange must be built inside a tokio runtime")
                .with_source(e)
        })?;

        let uri = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{}", endpoint)
        };

        let mut builder = Endpoint::from_shared(uri.clone())
            .map_err(|e| Error::configuration(format!("invalid IAM endpoint '{}': {}", uri, e)))?
            .user_agent(crate::user_agent::user_agent())
            .map_err(|e| Error::configuration(format!("invalid user agent: {}", e)))?;

        if uri.starts_with("https://") {
            builder = builder
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| Error::configuration(format!("invalid TLS settings: {}", e)))?;
        }

        Ok(Self::new(builder.connect_lazy()))
    }
}

impl TokenExchange for GrpcTokenExchange {
    fn create_token(&self, request: CreateTokenRequest) -> ExchangeFuture<'_> {
        let mut client = tonic::client::Grpc::new(self.channel.clone());
        Box::pin(async move {
            let request_id = uuid::Uuid::new_v4().to_string();

            client.ready().await.map_err(|e| {
                Error::connection(format!("IAM service not ready: {}", e))
                    .with_request_id(request_id.clone())
            })?;

            let mut grpc_request =
                tonic::Request::new(proto::CreateIamTokenRequest { jwt: request.jwt });
            if let Ok(value) = MetadataValue::try_from(request_id.as_str()) {
                grpc_request.metadata_mut().insert("x-request-id", value);
            }

            let codec = tonic_prost::ProstCodec::default();
            let response: tonic::Response<proto::CreateIamTokenResponse> = client
                .unary(grpc_request, PathAndQuery::from_static(CREATE_TOKEN_PATH), codec)
                .await
                .map_err(|status| Error::from(status).with_request_id(request_id.clone()))?;

            Ok(into_response(response.into_inner()))
        })
    }
}

fn into_response(message: proto::CreateIamTokenResponse) -> CreateTokenResponse {
    let expires_at = message.expires_at.and_then(|ts| {
        let nanos = u32::try_from(ts.nanos).ok()?;
        DateTime::<Utc>::from_timestamp(ts.seconds, nanos)
    });
    CreateTokenResponse {
        iam_token: message.iam_token,
        expires_at,
    }
}
