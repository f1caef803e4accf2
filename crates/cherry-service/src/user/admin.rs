//! Admin user management: listing, inspection, edits, and removal.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use cherry_auth::{Capability, RbacEnforcer};
use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::types::{ListParams, PageResponse};
use cherry_database::UserStore;
use cherry_entity::user::{User, UserChanges, UserRole};
use cherry_storage::StorageManager;

use crate::context::RequestContext;
use crate::query;
use crate::user::service::spawn_avatar_cleanup;
use crate::validation;

/// Admin edit form. Passwords are never set through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub password: Option<Value>,
}

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    /// Credential store.
    users: Arc<dyn UserStore>,
    /// Avatar storage, for cleanup on delete.
    storage: Arc<StorageManager>,
    /// RBAC enforcer.
    rbac: Arc<RbacEnforcer>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        storage: Arc<StorageManager>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            users,
            storage,
            rbac,
        }
    }

    /// Lists users matching the given filters.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        params: &ListParams,
    ) -> AppResult<PageResponse<User>> {
        self.rbac.require(ctx.role(), Capability::ManageUsers)?;

        let query = query::user_query(params)?;
        self.users.list(&query).await
    }

    /// Gets a single user by ID.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<User> {
        self.rbac.require(ctx.role(), Capability::ManageUsers)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No user found with that ID"))
    }

    /// Updates a user's name, email, or role.
    ///
    /// Demoting the only remaining admin is refused by the store, atomically
    /// with the write.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: AdminUpdateUserRequest,
    ) -> AppResult<User> {
        self.rbac.require(ctx.role(), Capability::ManageUsers)?;

        if req.password.as_ref().is_some_and(|p| !p.is_null()) {
            return Err(AppError::validation(
                "This route is not for password updates",
            ));
        }
        let changes = UserChanges {
            name: req.name.as_deref().map(validation::display_name).transpose()?,
            email: req.email.as_deref().map(validation::email_address).transpose()?,
            role: req.role.as_deref().map(str::parse::<UserRole>).transpose()?,
        };

        let user = if changes.is_empty() {
            self.users.find_by_id(user_id).await?
        } else {
            self.users.update(user_id, &changes).await?
        }
        .ok_or_else(|| AppError::not_found("No user found with that ID"))?;

        info!(
            admin_id = %ctx.user_id(),
            target_id = %user_id,
            role = %user.role,
            "User updated by admin"
        );
        Ok(user)
    }

    /// Deletes a user. The last admin cannot be removed.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> AppResult<()> {
        self.rbac.require(ctx.role(), Capability::ManageUsers)?;

        let removed = self
            .users
            .delete(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No user found with that ID"))?;

        if let Some(avatar) = removed.avatar {
            spawn_avatar_cleanup(self.storage.clone(), avatar);
        }
        info!(admin_id = %ctx.user_id(), target_id = %user_id, "User deleted");
        Ok(())
    }
}
