use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use judge_board::auth::RsaChallengeCipher;
use judge_board::config::BoardConfig;
use judge_board::judge::MemoryRepository;
use judge_board::server::{run_server, BoardState};
use judge_board::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "judge-board")]
#[command(version)]
#[command(about = "Coordinates remote judge nodes pulling grading jobs")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Seconds after which a silent judge node is forgotten
    #[arg(long, default_value = "300")]
    node_expiration_secs: u64,

    /// Seconds an unanswered authentication session stays valid
    #[arg(long, default_value = "60")]
    session_expiration_secs: u64,

    /// PEM file with the RSA public key shared by all judge nodes
    #[arg(long, env = "JUDGE_BOARD_CHALLENGE_PUBLIC_KEY")]
    challenge_public_key: PathBuf,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "JUDGE_BOARD_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Minutes an issued bearer token stays valid
    #[arg(long, default_value = "60")]
    jwt_expiration_mins: u64,

    /// Chunk size of the archive streaming buffer, in bytes
    #[arg(long, default_value = "65536")]
    chunk_size: usize,
}

impl Args {
    fn into_config(self) -> BoardConfig {
        let mut config = BoardConfig::new(SocketAddr::new(self.bind, self.port))
            .with_token_secret(self.jwt_secret)
            .with_public_key(self.challenge_public_key);
        config.fleet.expiration = Duration::from_secs(self.node_expiration_secs);
        config.handshake.expiration = Duration::from_secs(self.session_expiration_secs);
        config.token.expiration = Duration::from_secs(self.jwt_expiration_mins * 60);
        config.stream.chunk_size = self.chunk_size;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    config.validate()?;

    let key_path = config
        .handshake
        .public_key_path
        .clone()
        .ok_or("challenge public key not configured")?;
    let cipher = Arc::new(RsaChallengeCipher::load(&key_path)?);

    let repository = Arc::new(MemoryRepository::new());
    let state = BoardState::new(&config, cipher, repository.clone(), repository)?;

    let shutdown = install_shutdown_handler();
    run_server(config.listen_addr, state, shutdown).await?;
    Ok(())
}
