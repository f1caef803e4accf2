//! Storage-independent store traits implemented by the PostgreSQL
//! repositories and the in-memory stores.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cherry_core::result::AppResult;
use cherry_core::types::PageResponse;
use cherry_entity::announcement::{Announcement, AnnouncementQuery, PublishedQuery};
use cherry_entity::user::{NewUser, User, UserChanges, UserRole, UserQuery};

/// Returned when a write would leave the system without an administrator.
pub const LAST_ADMIN_MESSAGE: &str = "The system must retain at least one administrator";

/// Returned when an email is already taken by another account.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already registered";

/// Result of trying to redeem a password reset token.
#[derive(Debug, Clone)]
pub enum ResetOutcome {
    /// The token matched and was unexpired; the password is now changed and
    /// the token cleared.
    Consumed(User),
    /// The token matched but its expiry has passed.
    Expired,
    /// No account holds this token.
    Invalid,
}

/// Credential store: the sole owner of user records.
///
/// Writes that could remove the last administrator (demotion through
/// [`UserStore::update`] and [`UserStore::delete`]) must check and mutate
/// atomically and fail with [`LAST_ADMIN_MESSAGE`] as a conflict.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. A taken email is a conflict.
    async fn create(&self, data: &NewUser) -> AppResult<User>;

    /// Apply name/email/role changes. Returns `None` if the user is gone.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> AppResult<Option<User>>;

    /// Replace the password hash.
    async fn set_password(&self, id: Uuid, password_hash: &str) -> AppResult<Option<User>>;

    /// Replace (or clear) the avatar URL.
    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> AppResult<Option<User>>;

    /// Store a reset token hash and its expiry, or clear both.
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> AppResult<()>;

    /// Redeem a reset token: on success set the new password hash and clear
    /// the token in the same step, so a token works at most once.
    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> AppResult<ResetOutcome>;

    /// Remove a user, returning the removed record.
    async fn delete(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Count users holding `role`.
    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;

    /// Filter, sort, and page users.
    async fn list(&self, query: &UserQuery) -> AppResult<PageResponse<User>>;

    /// Display names for the given ids. Unknown ids are absent from the map.
    async fn names_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>>;
}

/// Announcement persistence.
#[async_trait]
pub trait AnnouncementStore: Send + Sync + Debug + 'static {
    /// Insert a fully built announcement.
    async fn create(&self, announcement: &Announcement) -> AppResult<Announcement>;

    /// Find an announcement by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>>;

    /// Overwrite the stored record. Returns `None` if it no longer exists.
    async fn update(&self, announcement: &Announcement) -> AppResult<Option<Announcement>>;

    /// Remove an announcement. Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Filter, sort, and page announcements.
    async fn list(&self, query: &AnnouncementQuery) -> AppResult<PageResponse<Announcement>>;

    /// Announcements visible at `query.now`, sticky first, then priority,
    /// then newest publish date.
    async fn list_published(&self, query: &PublishedQuery)
    -> AppResult<PageResponse<Announcement>>;
}

/// Escape `%`, `_` and `\` so a search term matches literally in `LIKE`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Reject removing admin rights from `target` when it is the only admin
/// among `admins`.
pub(crate) fn guard_last_admin(admins: &[Uuid], target: Uuid) -> AppResult<()> {
    if admins.len() <= 1 && admins.contains(&target) {
        return Err(cherry_core::AppError::conflict(LAST_ADMIN_MESSAGE));
    }
    Ok(())
}
