use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::RngCore;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::auth::cipher::ChallengeCipher;
use crate::auth::session::{HandshakeSession, SessionOutcome};
use crate::config::HandshakeConfig;
use crate::error::{BoardError, Result};

/// What a judge node receives when it starts authenticating.
#[derive(Debug, Clone)]
pub struct HandshakeChallenge {
    pub session_id: Uuid,
    pub encrypted_challenge: Vec<u8>,
}

/// Single-use challenge-response authentication for judge nodes.
///
/// A session is created with a random challenge encrypted under the judge
/// public key. The node proves it holds the private key by sending back the
/// plaintext. Each session is removed on its first verification attempt,
/// whatever the outcome, so a session id verifies successfully at most once.
pub struct HandshakeService {
    sessions: Mutex<HashMap<Uuid, HandshakeSession>>,
    cipher: Arc<dyn ChallengeCipher>,
    expiration: chrono::Duration,
    challenge_size: usize,
}

impl std::fmt::Debug for HandshakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeService")
            .field("sessions", &self.sessions.lock().len())
            .field("expiration", &self.expiration)
            .field("challenge_size", &self.challenge_size)
            .finish()
    }
}

impl HandshakeService {
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidArgument`] if the configured challenge
    /// size is zero.
    pub fn new(config: &HandshakeConfig, cipher: Arc<dyn ChallengeCipher>) -> Result<Self> {
        if config.challenge_size == 0 {
            return Err(BoardError::InvalidArgument(
                "challenge size must be positive".to_string(),
            ));
        }
        Ok(Self {
            sessions: Mutex::new(HashMap::new()),
            cipher,
            expiration: to_chrono(config.expiration),
            challenge_size: config.challenge_size,
        })
    }

    /// Start a new session.
    ///
    /// # Errors
    ///
    /// Propagates encryption failures from the cipher; no session is stored
    /// in that case.
    pub fn begin_session(&self) -> Result<HandshakeChallenge> {
        self.begin_session_at(Utc::now())
    }

    pub fn begin_session_at(&self, now: DateTime<Utc>) -> Result<HandshakeChallenge> {
        let mut challenge = vec![0u8; self.challenge_size];
        rand::thread_rng().fill_bytes(&mut challenge);
        let encrypted_challenge = self.cipher.encrypt(&challenge)?;

        let session = HandshakeSession {
            id: Uuid::new_v4(),
            expire_at: now + self.expiration,
            challenge,
            encrypted_challenge: encrypted_challenge.clone(),
        };
        let session_id = session.id;

        {
            let mut sessions = self.sessions.lock();
            sessions.insert(session_id, session);
            if sessions.len().is_power_of_two() {
                Self::sweep(&mut sessions, now);
            }
        }

        tracing::info!(session_id = %session_id, "Authentication session created");
        Ok(HandshakeChallenge {
            session_id,
            encrypted_challenge,
        })
    }

    /// Check `response` against the session's challenge and consume the session.
    pub fn verify(&self, session_id: Uuid, response: &[u8]) -> bool {
        self.verify_at(session_id, response, Utc::now()).is_verified()
    }

    pub fn verify_at(&self, session_id: Uuid, response: &[u8], now: DateTime<Utc>) -> SessionOutcome {
        let Some(session) = self.sessions.lock().remove(&session_id) else {
            tracing::warn!(session_id = %session_id, "Challenge for unknown session");
            return SessionOutcome::Unknown;
        };

        let outcome = if session.is_expired(now) {
            SessionOutcome::Expired
        } else if bool::from(session.challenge.as_slice().ct_eq(response)) {
            SessionOutcome::Verified
        } else {
            SessionOutcome::Rejected
        };

        if outcome.is_verified() {
            tracing::info!(session_id = %session_id, "Challenge verified");
        } else {
            tracing::warn!(session_id = %session_id, outcome = %outcome, "Challenge failed");
        }
        outcome
    }

    /// Number of sessions currently held, expired or not.
    pub fn pending(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Drop every expired session.
    pub fn remove_expired(&self) {
        Self::sweep(&mut self.sessions.lock(), Utc::now());
    }

    fn sweep(sessions: &mut HashMap<Uuid, HandshakeSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Expired authentication sessions swept");
        }
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}
