use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::BoardError;

/// Error returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidArgument(_) => ApiError::BadRequest(err.to_string()),
            BoardError::Token(_) => ApiError::Unauthorized(err.to_string()),
            BoardError::WorkerNotFound(_)
            | BoardError::SubmissionNotFound(_)
            | BoardError::ArchiveNotFound(_) => ApiError::NotFound(err.to_string()),
            BoardError::NotJudging(_) => ApiError::Conflict(err.to_string()),
            other => {
                tracing::error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

/// Malformed or mistyped JSON bodies are the client's fault.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn board_errors_map_to_status_codes() {
        let cases = [
            (
                BoardError::InvalidArgument("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                BoardError::WorkerNotFound(IpAddr::from([127, 0, 0, 1])),
                StatusCode::NOT_FOUND,
            ),
            (
                BoardError::NotJudging(uuid::Uuid::new_v4()),
                StatusCode::CONFLICT,
            ),
            (BoardError::Disposed, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
