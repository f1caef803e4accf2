//! Single-use password reset tokens.
//!
//! The raw value goes to the user exactly once; only its SHA-256 digest and
//! expiry are persisted.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Bytes of randomness in a raw reset token.
const TOKEN_BYTES: usize = 32;

/// A freshly generated reset token.
#[derive(Clone)]
pub struct ResetToken {
    /// Hex-encoded random value, delivered to the user.
    pub raw: String,
    /// SHA-256 hex digest of `raw`, stored on the user record.
    pub hash: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetToken")
            .field("hash", &self.hash)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl ResetToken {
    /// Generate a token valid for `ttl` from `now`.
    pub fn generate(now: DateTime<Utc>, ttl: Duration) -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        let hash = hash_reset_token(&raw);
        Self {
            raw,
            hash,
            expires_at: now + ttl,
        }
    }
}

/// Deterministic one-way digest used to match an incoming raw token.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
