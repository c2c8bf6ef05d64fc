use std::net::IpAddr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fleet::{PerformanceSnapshot, WorkerRecord};
use crate::server::error::ApiError;
use crate::error::BoardError;
use crate::server::extract::{AuthenticatedJudge, JsonBody};
use crate::server::BoardState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeNodeInfo {
    pub address: String,
    pub last_heart_beat: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub queued_submissions: u32,
    pub is_blocked: bool,
    pub performance: Option<PerformanceSnapshot>,
}

impl From<WorkerRecord> for JudgeNodeInfo {
    fn from(record: WorkerRecord) -> Self {
        Self {
            address: record.address.to_string(),
            last_heart_beat: record.last_heartbeat,
            last_seen: record.last_seen,
            queued_submissions: record.queued_jobs,
            is_blocked: record.blocked,
            performance: record.performance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlockQuery {
    blocked: Option<bool>,
}

/// `GET /judges`
pub(crate) async fn list(State(state): State<BoardState>) -> Json<Vec<JudgeNodeInfo>> {
    let nodes = state
        .registry
        .list_active()
        .into_iter()
        .map(JudgeNodeInfo::from)
        .collect();
    Json(nodes)
}

/// `PATCH /judges`
pub(crate) async fn heartbeat(
    State(state): State<BoardState>,
    judge: AuthenticatedJudge,
    JsonBody(performance): JsonBody<PerformanceSnapshot>,
) -> Result<StatusCode, ApiError> {
    performance.validate()?;
    tracing::debug!(worker = %judge.addr, cpu = performance.cpu_usage, "Heartbeat received");
    state.registry.record_heartbeat(judge.addr, performance);
    Ok(StatusCode::OK)
}

/// `PUT /judges/{address}/block?blocked=bool`
pub(crate) async fn set_blocked(
    State(state): State<BoardState>,
    Path(address): Path<String>,
    Query(query): Query<BlockQuery>,
) -> Result<StatusCode, ApiError> {
    let address: IpAddr = address
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid IP address: {address}")))?;

    if !state
        .registry
        .set_blocked(address, query.blocked.unwrap_or(true))
    {
        return Err(BoardError::WorkerNotFound(address).into());
    }
    Ok(StatusCode::OK)
}
