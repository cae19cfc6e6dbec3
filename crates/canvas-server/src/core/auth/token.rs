//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `{sub, email, iat, exp}`. Nothing is
//! persisted: every request re-checks signature and expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expires at, seconds since epoch
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Longest accepted token lifetime: ten years.
    pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self> {
        if ttl.is_zero() || ttl > Self::MAX_TTL {
            return Err(Error::Internal(format!(
                "token ttl must be between 1s and {}s, got {}s",
                Self::MAX_TTL.as_secs(),
                ttl.as_secs()
            )));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| Error::Internal(format!("token ttl out of range: {}", e)))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    /// Issue a token valid from now for the configured ttl.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, email: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| Error::Internal("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_owned(),
            email: email.to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))
    }

    /// Verify signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        // Expiry is checked below against `now`, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("[Auth] Token rejected: {}", e);
            Error::InvalidToken
        })?;

        if now.timestamp() >= data.claims.exp {
            debug!("[Auth] Token expired for {}", data.claims.sub);
            return Err(Error::InvalidToken);
        }

        Ok(data.claims)
    }
}
