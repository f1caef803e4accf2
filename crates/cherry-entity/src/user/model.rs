//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, stored trimmed and lowercased; unique case-insensitively.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// User role (RBAC).
    pub role: UserRole,
    /// Public URL of the uploaded avatar.
    pub avatar: Option<String>,
    /// SHA-256 hex of the outstanding password reset token.
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    /// When the outstanding reset token stops being accepted.
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Trimmed display name.
    pub name: String,
    /// Assigned role.
    pub role: UserRole,
}

/// Mutable account fields. Self-service profile edits never set `role`.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New display name.
    pub name: Option<String>,
    /// New normalized email.
    pub email: Option<String>,
    /// New role (admin edits only).
    pub role: Option<UserRole>,
}

impl UserChanges {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none()
    }

    /// Whether applying these changes would take admin rights away from `user`.
    pub fn demotes(&self, user: &User) -> bool {
        user.is_admin() && self.role.is_some_and(|r| !r.is_admin())
    }
}

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
