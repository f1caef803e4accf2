//! In-memory credential store.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::types::PageResponse;
use cherry_entity::user::{NewUser, User, UserChanges, UserQuery, UserRole, UserSortKey};

use crate::store::{DUPLICATE_EMAIL_MESSAGE, ResetOutcome, UserStore, guard_last_admin};

/// Credential store kept in process memory. Every write holds the single
/// write lock for its whole check-and-mutate sequence.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

fn admin_ids(users: &HashMap<Uuid, User>) -> Vec<Uuid> {
    users
        .values()
        .filter(|u| u.is_admin())
        .map(|u| u.id)
        .collect()
}

fn is_match(user: &User, query: &UserQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        if !user.name.to_lowercase().contains(&needle)
            && !user.email.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    query.role.is_none_or(|r| user.role == r) && query.created.contains(user.created_at)
}

fn compare(a: &User, b: &User, key: UserSortKey) -> Ordering {
    match key {
        UserSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        UserSortKey::Name => a.name.cmp(&b.name),
        UserSortKey::Email => a.email.cmp(&b.email),
        UserSortKey::Role => a.role.is_admin().cmp(&b.role.is_admin()),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if email_taken(&users, &data.email, None) {
            return Err(AppError::conflict(DUPLICATE_EMAIL_MESSAGE));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            name: data.name.clone(),
            role: data.role,
            avatar: None,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        if changes.role.is_some_and(|r| !r.is_admin()) {
            guard_last_admin(&admin_ids(&users), id)?;
        }
        if let Some(email) = &changes.email
            && email_taken(&users, email, Some(id))
        {
            return Err(AppError::conflict(DUPLICATE_EMAIL_MESSAGE));
        }
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.avatar = avatar.map(str::to_string);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            let (hash, expires) = token.unzip();
            user.password_reset_token = hash.map(str::to_string);
            user.password_reset_expires = expires;
        }
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> AppResult<ResetOutcome> {
        let mut users = self.users.write().await;
        let Some(user) = users
            .values_mut()
            .find(|u| u.password_reset_token.as_deref() == Some(token_hash))
        else {
            return Ok(ResetOutcome::Invalid);
        };
        if user.password_reset_expires.is_none_or(|exp| exp <= now) {
            return Ok(ResetOutcome::Expired);
        }
        user.password_hash = password_hash.to_string();
        user.password_reset_token = None;
        user.password_reset_expires = None;
        user.updated_at = Utc::now();
        Ok(ResetOutcome::Consumed(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        guard_last_admin(&admin_ids(&users), id)?;
        Ok(users.remove(&id))
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .count() as u64)
    }

    async fn list(&self, query: &UserQuery) -> AppResult<PageResponse<User>> {
        let users = self.users.read().await;
        let mut matched: Vec<&User> = users.values().filter(|u| is_match(u, query)).collect();
        matched.sort_by(|a, b| {
            query
                .sort
                .direction
                .apply(compare(a, b, query.sort.key))
                .then_with(|| a.id.cmp(&b.id))
        });
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .cloned()
            .collect();
        Ok(PageResponse::new(items, &query.page, total))
    }

    async fn names_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.name.clone())))
            .collect())
    }
}
