use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::judge::JudgeResult;
use crate::server::error::ApiError;
use crate::server::extract::{AuthenticatedJudge, JsonBody};
use crate::server::BoardState;

/// `GET /submissions`
///
/// 200 with the next job, 204 when the queue is empty, 403 for blocked or
/// unregistered nodes.
pub(crate) async fn pull(
    State(state): State<BoardState>,
    judge: AuthenticatedJudge,
) -> Result<Response, ApiError> {
    state.ensure_not_blocked(judge.addr)?;
    state.registry.touch_last_seen(judge.addr);
    tracing::info!(worker = %judge.addr, "Fetching submission for judge node");

    match state.dispatcher.next_job().await? {
        Some(job) => {
            state.registry.adjust_queue_depth(judge.addr, 1);
            Ok(Json(job).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `PATCH /submissions/{submission_id}`
///
/// 404 for unknown submissions, 409 when the submission is not being judged.
pub(crate) async fn report(
    State(state): State<BoardState>,
    judge: AuthenticatedJudge,
    Path(submission_id): Path<String>,
    JsonBody(result): JsonBody<JudgeResult>,
) -> Result<StatusCode, ApiError> {
    let submission_id: Uuid = submission_id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid submission ID".to_string()))?;

    state.registry.touch_last_seen(judge.addr);
    tracing::info!(
        submission_id = %submission_id,
        worker = %judge.addr,
        "Judge of submission finished"
    );

    // Only a submission still being judged frees a queue slot.
    state.dispatcher.complete(submission_id, result).await?;
    state.registry.adjust_queue_depth(judge.addr, -1);
    Ok(StatusCode::OK)
}
