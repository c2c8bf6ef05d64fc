use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BoardError, Result};

/// Judge node registry settings.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// A node not seen for longer than this is dropped from the registry.
    pub expiration: Duration,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            expiration: Duration::from_secs(5 * 60),
        }
    }
}

/// Challenge-response handshake settings.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Lifetime of an unanswered session.
    pub expiration: Duration,
    /// Size of the random challenge in bytes.
    pub challenge_size: usize,
    /// PEM file holding the RSA public key shared by all judge nodes.
    pub public_key_path: Option<PathBuf>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            expiration: Duration::from_secs(60),
            challenge_size: 16,
            public_key_path: None,
        }
    }
}

/// Bearer token settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret used to sign and validate tokens.
    pub secret: String,
    /// Lifetime of an issued token.
    pub expiration: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration: Duration::from_secs(60 * 60),
        }
    }
}

/// Archive streaming settings.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Chunk capacity of the pipe buffer.
    pub chunk_size: usize,
    /// Largest read handed to the HTTP body at once.
    pub read_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            read_size: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub listen_addr: SocketAddr,
    pub fleet: FleetConfig,
    pub handshake: HandshakeConfig,
    pub token: TokenConfig,
    pub stream: StreamConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            fleet: FleetConfig::default(),
            handshake: HandshakeConfig::default(),
            token: TokenConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token.secret = secret.into();
        self
    }

    pub fn with_public_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.handshake.public_key_path = Some(path.into());
        self
    }

    /// Reject settings the services cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.fleet.expiration.is_zero() {
            return Err(BoardError::Config(
                "node expiration must be positive".to_string(),
            ));
        }
        if self.handshake.expiration.is_zero() {
            return Err(BoardError::Config(
                "session expiration must be positive".to_string(),
            ));
        }
        if self.handshake.challenge_size == 0 {
            return Err(BoardError::Config(
                "challenge size must be positive".to_string(),
            ));
        }
        if self.token.secret.is_empty() {
            return Err(BoardError::Config("token secret is empty".to_string()));
        }
        if self.token.expiration.is_zero() {
            return Err(BoardError::Config(
                "token expiration must be positive".to_string(),
            ));
        }
        if self.stream.chunk_size == 0 || self.stream.read_size == 0 {
            return Err(BoardError::Config(
                "stream chunk and read sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
