use axum::extract::{Path, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::error::ApiError;
use crate::server::extract::{JsonBody, PeerAddr};
use crate::server::BoardState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    /// Base64 of the encrypted challenge.
    pub challenge: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeRequest {
    /// Base64 of the decrypted challenge.
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResult {
    pub jwt: String,
}

/// `POST /auth`
pub(crate) async fn begin(
    State(state): State<BoardState>,
    PeerAddr(peer): PeerAddr,
) -> Result<Json<SessionResponse>, ApiError> {
    tracing::info!(peer = %peer, "Authenticating remote address");
    let challenge = state.handshake.begin_session()?;
    Ok(Json(SessionResponse {
        id: challenge.session_id,
        challenge: STANDARD.encode(&challenge.encrypted_challenge),
    }))
}

/// `PATCH /auth/{session_id}`
pub(crate) async fn complete(
    State(state): State<BoardState>,
    PeerAddr(peer): PeerAddr,
    Path(session_id): Path<String>,
    JsonBody(request): JsonBody<ChallengeRequest>,
) -> Result<Json<ChallengeResult>, ApiError> {
    let session_id: Uuid = session_id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid session ID".to_string()))?;
    let response = STANDARD
        .decode(request.response.as_bytes())
        .map_err(|_| ApiError::BadRequest("response is not valid base64".to_string()))?;

    if !state.handshake.verify(session_id, &response) {
        return Err(ApiError::Unauthorized("challenge failed".to_string()));
    }

    let jwt = state.tokens.issue(&peer.to_string())?;
    Ok(Json(ChallengeResult { jwt }))
}
