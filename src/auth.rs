//! Caller credentials relayed to the backend.
//!
//! The gateway never validates tokens itself; the backend owns sessions.
//! Handlers that act on behalf of a signed-in user pick up the caller's
//! `Authorization` header with [`ForwardedAuthorization`] and pass it along
//! byte for byte.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};

/// The inbound `Authorization` header, if any.
#[derive(Debug, Clone)]
pub struct ForwardedAuthorization(pub Option<HeaderValue>);

#[async_trait]
impl<S> FromRequestParts<S> for ForwardedAuthorization
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.headers.get(AUTHORIZATION).cloned()))
    }
}
