//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cherry_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Built by the access gate after the bearer token is verified and the
/// user is re-read from the store, so `user.role` is the role as of this
/// request rather than as of token issuance.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user, freshly loaded.
    pub user: User,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user: User) -> Self {
        Self {
            user,
            request_time: Utc::now(),
        }
    }

    /// The authenticated user's ID.
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// The user's current role.
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}
