use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An outstanding authentication attempt.
#[derive(Debug, Clone)]
pub struct HandshakeSession {
    pub id: Uuid,
    pub expire_at: DateTime<Utc>,
    pub challenge: Vec<u8>,
    pub encrypted_challenge: Vec<u8>,
}

impl HandshakeSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expire_at
    }
}

/// Terminal state a session reaches on its single verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Verified,
    Rejected,
    Expired,
    /// The id never existed or was already consumed.
    Unknown,
}

impl SessionOutcome {
    pub fn is_verified(self) -> bool {
        self == SessionOutcome::Verified
    }
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionOutcome::Verified => write!(f, "verified"),
            SessionOutcome::Rejected => write!(f, "rejected"),
            SessionOutcome::Expired => write!(f, "expired"),
            SessionOutcome::Unknown => write!(f, "unknown"),
        }
    }
}
