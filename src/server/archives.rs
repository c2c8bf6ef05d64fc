use std::io::{self, Read};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::error::BoardError;
use crate::server::error::ApiError;
use crate::server::extract::AuthenticatedJudge;
use crate::server::BoardState;
use crate::stream::{pipe_with_chunk_size, Consumer};

/// Reads buffered between the blocking reader and the response body.
const BODY_CHANNEL_SIZE: usize = 4;

/// `GET /archives/{archive_id}`
///
/// The repository writes the archive into a pipe on its own task while the
/// response body drains the other end.
pub(crate) async fn download(
    State(state): State<BoardState>,
    judge: AuthenticatedJudge,
    Path(archive_id): Path<String>,
) -> Result<Response, ApiError> {
    let archive_id: Uuid = archive_id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid archive ID".to_string()))?;

    state.ensure_not_blocked(judge.addr)?;
    state.registry.touch_last_seen(judge.addr);
    if !state.problems.archive_exists(archive_id).await? {
        return Err(BoardError::ArchiveNotFound(archive_id).into());
    }
    tracing::info!(archive_id = %archive_id, worker = %judge.addr, "Streaming archive to judge node");

    let (producer, consumer) = pipe_with_chunk_size(state.stream.chunk_size)?;
    let problems = state.problems.clone();
    tokio::spawn(async move {
        if let Err(e) = problems
            .download_test_data_archive(archive_id, producer)
            .await
        {
            tracing::warn!(archive_id = %archive_id, error = %e, "Archive download failed");
        }
    });

    let body = Body::from_stream(consumer_stream(consumer, state.stream.read_size));
    Ok(([(CONTENT_TYPE, "application/zip")], body).into_response())
}

/// Drain `consumer` on a blocking thread and expose it as an async stream.
pub(crate) fn consumer_stream(
    mut consumer: Consumer,
    read_size: usize,
) -> ReceiverStream<io::Result<Bytes>> {
    let (tx, rx) = mpsc::channel(BODY_CHANNEL_SIZE);

    tokio::task::spawn_blocking(move || {
        let mut buf = vec![0u8; read_size];
        loop {
            match consumer.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.blocking_send(Ok(Bytes::copy_from_slice(&buf[..n]))).is_err() {
                        // Client went away.
                        consumer.close();
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    break;
                }
            }
        }
    });

    ReceiverStream::new(rx)
}
