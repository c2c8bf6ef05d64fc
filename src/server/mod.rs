//! HTTP API used by judge nodes and operators.
//!
//! | Route | Auth | Purpose |
//! |---|---|---|
//! | `GET /judges` | - | list live judge nodes |
//! | `PATCH /judges` | bearer | heartbeat with load report |
//! | `PUT /judges/{address}/block` | - | block or unblock a node |
//! | `POST /auth` | - | begin a challenge session |
//! | `PATCH /auth/{session_id}` | - | answer the challenge, receive a token |
//! | `GET /submissions` | bearer | pull the next job |
//! | `PATCH /submissions/{id}` | bearer | report a judge result |
//! | `GET /archives/{id}` | bearer | stream a test data archive |

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{ChallengeCipher, HandshakeService, JwtIssuer, TokenIssuer};
use crate::config::{BoardConfig, StreamConfig};
use crate::error::Result;
use crate::fleet::FleetRegistry;
use crate::judge::{JobDispatcher, ProblemRepository, SubmissionRepository};

pub mod archives;
pub mod error;
pub mod extract;
pub mod handshake;
pub mod judges;
pub mod submissions;

pub use error::ApiError;
pub use extract::{AuthenticatedJudge, JsonBody, PeerAddr};

/// Shared services behind every route.
#[derive(Clone)]
pub struct BoardState {
    pub registry: Arc<FleetRegistry>,
    pub handshake: Arc<HandshakeService>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub dispatcher: JobDispatcher,
    pub problems: Arc<dyn ProblemRepository>,
    pub stream: StreamConfig,
}

impl BoardState {
    /// Wire up the services described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the handshake or token settings are unusable.
    pub fn new(
        config: &BoardConfig,
        cipher: Arc<dyn ChallengeCipher>,
        submissions: Arc<dyn SubmissionRepository>,
        problems: Arc<dyn ProblemRepository>,
    ) -> Result<Self> {
        Ok(Self {
            registry: Arc::new(FleetRegistry::new(config.fleet.clone())),
            handshake: Arc::new(HandshakeService::new(&config.handshake, cipher)?),
            tokens: Arc::new(JwtIssuer::new(&config.token)?),
            dispatcher: JobDispatcher::new(submissions, problems.clone()),
            problems,
            stream: config.stream.clone(),
        })
    }

    /// Refuse job data to blocked nodes and to nodes the registry does not know.
    pub(crate) fn ensure_not_blocked(&self, addr: IpAddr) -> std::result::Result<(), ApiError> {
        if self.registry.is_blocked(addr) {
            tracing::warn!(worker = %addr, "Blocked or unregistered judge node refused");
            return Err(ApiError::Forbidden(format!(
                "judge node {addr} is blocked or not registered"
            )));
        }
        Ok(())
    }
}

pub fn router(state: BoardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/judges", get(judges::list).patch(judges::heartbeat))
        .route("/judges/:address/block", put(judges::set_blocked))
        .route("/auth", post(handshake::begin))
        .route("/auth/:session_id", patch(handshake::complete))
        .route("/submissions", get(submissions::pull))
        .route("/submissions/:submission_id", patch(submissions::report))
        .route("/archives/:archive_id", get(archives::download))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    addr: SocketAddr,
    state: BoardState,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Starting judge board server");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    tracing::info!("Judge board server stopped");
    Ok(())
}
