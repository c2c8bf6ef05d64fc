use std::net::IpAddr;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Stream pipe has been disposed")]
    Disposed,

    #[error("Judge node not found: {0}")]
    WorkerNotFound(IpAddr),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(Uuid),

    #[error("Submission is not being judged: {0}")]
    NotJudging(Uuid),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(Uuid),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
