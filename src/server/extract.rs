use std::net::{IpAddr, SocketAddr};

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::Claims;
use crate::server::error::ApiError;
use crate::server::BoardState;

/// A judge node that presented a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedJudge {
    /// Address the request came from; the registry key for this node.
    pub addr: IpAddr,
    pub claims: Claims,
}

/// Address of the connected peer.
pub(crate) fn peer_addr(parts: &Parts) -> Result<IpAddr, ApiError> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .ok_or_else(|| ApiError::Internal("peer address unavailable".to_string()))
}

#[async_trait]
impl FromRequestParts<BoardState> for AuthenticatedJudge {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &BoardState,
    ) -> Result<Self, Self::Rejection> {
        let addr = peer_addr(parts)?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let claims = state.tokens.validate(token.trim()).map_err(|e| {
            tracing::warn!(peer = %addr, error = %e, "Rejected bearer token");
            ApiError::Unauthorized("invalid bearer token".to_string())
        })?;

        Ok(Self { addr, claims })
    }
}

/// The connecting peer's address, for routes that do not need a token.
#[derive(Debug, Clone, Copy)]
pub struct PeerAddr(pub IpAddr);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PeerAddr {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        peer_addr(parts).map(PeerAddr)
    }
}

/// `axum::Json` whose rejections render as [`ApiError::BadRequest`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
