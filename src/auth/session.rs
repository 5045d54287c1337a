//! Session tokens for Mailroom.
//!
//! A session is a signed HS256 token naming the user. It is handed to the
//! browser in a cookie and resolved back to a [`User`] on every request.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::User;

/// Session token errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token could not be signed.
    #[error("failed to sign session token: {0}")]
    Sign(String),

    /// Token is malformed, forged or expired.
    #[error("invalid session token")]
    Invalid,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username at login time.
    pub username: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// Token ID.
    pub jti: String,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: u64,
}

impl SessionKeys {
    /// Create session keys from a shared secret.
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs,
        }
    }

    /// Issue a session token for a user.
    pub fn issue(&self, user: &User) -> Result<String, SessionError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: user.id,
            username: user.username.clone(),
            iat: now,
            exp: now + self.expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Sign(e.to_string()))
    }

    /// Verify a session token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                SessionError::Invalid
            })
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("expiry_secs", &self.expiry_secs)
            .finish_non_exhaustive()
    }
}
