//! Argon2id password hashing.
//!
//! Stored credentials are PHC strings (`$argon2id$v=19$...`); the plaintext
//! never leaves this module in any other form.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};

use cherry_core::error::AppError;
use cherry_core::result::AppResult;

/// Hash of a password nobody knows, made with the default parameters. Login
/// attempts for unknown emails are checked against it so they cost the same
/// as attempts with a wrong password.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                          AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// One-way password transform and verification.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Argon2id with the library's recommended parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` under a fresh random salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid PHC
    /// string.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Stored password hash is malformed: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Spend one verification's worth of work on a credential that cannot
    /// match. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        self.verify_password(password, DECOY_HASH).unwrap_or(false)
    }
}
