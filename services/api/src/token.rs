//! Session token service
//!
//! Issues and validates the signed bearer tokens carried in the
//! `auth_token` cookie. Tokens are HS256 JWTs over a shared secret with a
//! fixed one-day validity window; there is no server-side revocation, so
//! a token stays valid until it expires.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session validity window in seconds (one day)
pub const SESSION_TTL_SECS: u64 = 86_400;

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Session token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Initialize a token service from the shared signing secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact: a token is rejected the second after its window closes
        validation.leeway = 0;

        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a session token for a user, expiring one day from now
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        self.issue_at(user_id, unix_now()?)
    }

    /// Issue a session token with an explicit issuance time
    pub fn issue_at(&self, user_id: Uuid, issued_at: u64) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            iat: issued_at,
            exp: issued_at + SESSION_TTL_SECS,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Validate a token and return the embedded user id
    ///
    /// Fails on malformed tokens, bad signatures and expired windows.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims.sub)
    }
}

fn unix_now() -> Result<u64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs();
    Ok(now)
}
