//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing, password policy, and bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Identity token lifetime in minutes.
    #[serde(default = "default_jwt_ttl")]
    pub jwt_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Require mixed character classes and a zxcvbn score of at least 3.
    #[serde(default)]
    pub password_require_strong: bool,
    /// Password reset token lifetime in minutes.
    #[serde(default = "default_reset_ttl")]
    pub reset_token_ttl_minutes: u64,
    /// Email of the administrator created at startup when no admin exists.
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    /// Password for the bootstrap administrator.
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
    /// Display name for the bootstrap administrator.
    #[serde(default = "default_bootstrap_name")]
    pub bootstrap_admin_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_ttl_minutes: default_jwt_ttl(),
            password_min_length: default_password_min(),
            password_require_strong: false,
            reset_token_ttl_minutes: default_reset_ttl(),
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
            bootstrap_admin_name: default_bootstrap_name(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_ttl() -> u64 {
    90 * 24 * 60 // 90 days
}

fn default_password_min() -> usize {
    6
}

fn default_reset_ttl() -> u64 {
    10
}

fn default_bootstrap_name() -> String {
    "Administrator".to_string()
}
