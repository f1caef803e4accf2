//! Request bodies not owned by a service.

use serde::Deserialize;

/// `{email}` for password recovery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRequest {
    pub email: Option<String>,
}

/// `{password}` for reset and account deletion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordRequest {
    pub password: Option<String>,
}
