//! Signed Access Token
//!
//! A tamper-evident, time-limited credential asserting that payment
//! completed, verifiable without a remote call. HS256 with a symmetric
//! secret; the payload carries a purpose claim and an expiry.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::constants::payment::PURPOSE_PAYMENT_COMPLETED;
use crate::types::{Result, TinteroError};

/// Claims carried by the access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// What this token grants; must mark a completed payment
    pub purpose: String,
    /// Expiration time (unix timestamp, seconds)
    pub exp: u64,
    /// Issued at (unix timestamp, seconds)
    pub iat: u64,
}

/// Mints and verifies single-purpose access tokens
pub struct TokenSigner {
    secret: SecretString,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: SecretString, ttl_mins: u64) -> Self {
        Self {
            secret,
            ttl: Duration::from_secs(ttl_mins * 60),
        }
    }

    /// Mint a payment-completed token valid for the configured window.
    pub fn mint(&self) -> Result<String> {
        let now = current_timestamp();
        let claims = AccessClaims {
            purpose: PURPOSE_PAYMENT_COMPLETED.to_string(),
            exp: now + self.ttl.as_secs(),
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| TinteroError::SessionCreation(format!("failed to mint access token: {}", e)))
    }

    /// Verify signature, expiry, and purpose. Any failure is an error; the
    /// caller decides how to surface it (the gate fails closed).
    pub fn verify(&self, token: &str) -> Result<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Strict expiry: a token is valid for exactly its window
        validation.leeway = 0;

        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| TinteroError::PaymentRequired(format!("invalid access token: {}", e)))?;

        if data.claims.purpose != PURPOSE_PAYMENT_COMPLETED {
            return Err(TinteroError::PaymentRequired(format!(
                "access token purpose '{}' does not mark a completed payment",
                data.claims.purpose
            )));
        }

        Ok(data.claims)
    }
}

/// Current unix timestamp in seconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
