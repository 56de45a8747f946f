//! Session tokens (HS256 JWT).

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issues and validates session tokens.
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl SessionTokens {
    /// Create a token issuer with a secret key.
    #[must_use]
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry,
        }
    }

    /// Create a token issuer from a hex-encoded secret.
    ///
    /// # Errors
    ///
    /// Returns error if hex decoding fails.
    pub fn from_hex_secret(hex_secret: &str, expiry: Duration) -> Result<Self, AuthError> {
        let secret = hex::decode(hex_secret)
            .map_err(|e| AuthError::Token(format!("Invalid hex secret: {e}")))?;
        Ok(Self::new(&secret, expiry))
    }

    /// Generate a random 256-bit secret as hex string.
    #[must_use]
    pub fn generate_hex_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Issue a session token.
    ///
    /// # Errors
    ///
    /// Returns error if the expiry is out of range or token encoding fails.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let exp = chrono::Duration::from_std(self.expiry)
            .ok()
            .and_then(|expiry| now.checked_add_signed(expiry))
            .ok_or_else(|| {
                AuthError::Token(format!("Token expiry out of range: {:?}", self.expiry))
            })?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(format!("Encoding failed: {e}")))?;

        Ok((token, exp))
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    ///
    /// Returns error if token is invalid or expired.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::Token(format!("Validation failed: {e}")))
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
