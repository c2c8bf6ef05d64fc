//! Judge node authentication.
//!
//! # Flow
//!
//! 1. The node asks for a session; [`HandshakeService::begin_session`] returns
//!    a random challenge encrypted with the shared judge public key.
//! 2. The node decrypts it with its private key and sends the plaintext back.
//! 3. [`HandshakeService::verify`] compares and consumes the session.
//! 4. On success a [`TokenIssuer`] mints a bearer token for the node's address,
//!    which it presents on every later request.

pub mod cipher;
pub mod handshake;
pub mod session;
pub mod token;

pub use cipher::{ChallengeCipher, RsaChallengeCipher};
pub use handshake::{HandshakeChallenge, HandshakeService};
pub use session::{HandshakeSession, SessionOutcome};
pub use token::{Claims, JwtIssuer, TokenIssuer};
