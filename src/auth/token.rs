use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::TokenConfig;
use crate::error::{BoardError, Result};

/// Claims carried by a judge bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated identity, the node's IP address.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and checks bearer tokens for authenticated judge nodes.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, identity: &str) -> Result<String>;

    fn validate(&self, token: &str) -> Result<Claims>;
}

/// HS256 JWT issuer.
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiration: Duration,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer {
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidArgument`] if the secret is empty.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(BoardError::InvalidArgument(
                "token secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expiration: config.expiration,
        })
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, identity: &str) -> Result<String> {
        let iat = Utc::now().timestamp();
        let lifetime = i64::try_from(self.expiration.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: identity.to_string(),
            iat,
            exp: iat.saturating_add(lifetime),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        tracing::info!(identity, "Bearer token issued");
        Ok(token)
    }

    fn validate(&self, token: &str) -> Result<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
