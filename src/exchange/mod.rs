//! Token exchange: trading a signed assertion for an IAM token.
//!
//! [`IamAuthService`](crate::auth::IamAuthService) talks to IAM through the
//! [`TokenExchange`] trait. Two implementations ship with the crate:
//!
//! - [`GrpcTokenExchange`] (feature `grpc`, default): `IamTokenService/Create` over tonic
//! - [`RestTokenExchange`] (feature `rest`, default): `POST /iam/v1/tokens` over reqwest
//!
//! Tests use [`MockTokenExchange`](crate::testing::MockTokenExchange).

mod traits;

#[cfg(feature = "grpc")]
mod grpc;

#[cfg(feature = "rest")]
mod rest;

pub use traits::{CreateTokenRequest, CreateTokenResponse, ExchangeFuture, TokenExchange};

#[cfg(feature = "grpc")]
#[cfg_attr(docsrs, doc(cfg(feature = "grpc")))]
pub use grpc::GrpcTokenExchange;

#[cfg(feature = "rest")]
#[cfg_attr(docsrs, doc(cfg(feature = "rest")))]
pub use rest::{DEFAULT_IAM_REST_URL, RestTokenExchange};
