pub mod auth;
pub mod config;
pub mod error;
pub mod fleet;
pub mod judge;
pub mod server;
pub mod shutdown;
pub mod stream;

pub use error::{BoardError, Result};
