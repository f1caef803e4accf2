//! User self-service operations: profile edits, avatar upload, and account
//! deactivation.

use std::sync::Arc;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use cherry_auth::PasswordHasher;
use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_database::UserStore;
use cherry_entity::user::{User, UserChanges};
use cherry_storage::StorageManager;

use crate::context::RequestContext;
use crate::validation;

/// Key prefix under which avatars are stored.
const AVATAR_PREFIX: &str = "avatars";

/// Profile edit form. `password` is captured only to reject it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<Value>,
}

/// An uploaded avatar image.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    /// Client-supplied file name; only its extension is used.
    pub file_name: Option<String>,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Credential store.
    users: Arc<dyn UserStore>,
    /// Avatar storage.
    storage: Arc<StorageManager>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Upload size cap in bytes.
    max_avatar_bytes: u64,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        storage: Arc<StorageManager>,
        hasher: Arc<PasswordHasher>,
        max_avatar_bytes: u64,
    ) -> Self {
        Self {
            users,
            storage,
            hasher,
            max_avatar_bytes,
        }
    }

    /// Update the caller's own name and email. Role and password are not
    /// editable here.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> AppResult<User> {
        if req.password.as_ref().is_some_and(|p| !p.is_null()) {
            return Err(AppError::validation(
                "This route is not for password updates. Please use /update-password.",
            ));
        }

        let changes = UserChanges {
            name: req.name.as_deref().map(validation::display_name).transpose()?,
            email: req.email.as_deref().map(validation::email_address).transpose()?,
            role: None,
        };
        if changes.is_empty() {
            return Ok(ctx.user.clone());
        }

        let user = self
            .users
            .update(ctx.user_id(), &changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Store a new avatar image and point the caller's profile at it. The
    /// previous image is removed afterwards on a best-effort basis.
    pub async fn upload_avatar(
        &self,
        ctx: &RequestContext,
        upload: AvatarUpload,
    ) -> AppResult<User> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::validation("Please upload an image file"));
        }
        if upload.data.is_empty() {
            return Err(AppError::validation("Please choose an avatar file to upload"));
        }
        if upload.data.len() as u64 > self.max_avatar_bytes {
            return Err(AppError::validation(format!(
                "Avatar must be at most {} MB",
                self.max_avatar_bytes / (1024 * 1024)
            )));
        }

        let key = format!(
            "{AVATAR_PREFIX}/{}{}",
            Uuid::new_v4().simple(),
            avatar_extension(upload.file_name.as_deref(), &upload.content_type)
        );
        let url = self
            .storage
            .put(&key, upload.data, &upload.content_type)
            .await?;

        let user = match self.users.set_avatar(ctx.user_id(), Some(&url)).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.discard_avatar(&url).await;
                return Err(AppError::not_found("User not found"));
            }
            Err(e) => {
                self.discard_avatar(&url).await;
                return Err(e);
            }
        };

        if let Some(previous) = ctx.user.avatar.as_deref().filter(|p| *p != url) {
            self.discard_avatar(previous).await;
        }

        info!(user_id = %user.id, key = %key, "Avatar updated");
        Ok(user)
    }

    /// Permanently delete the caller's account after re-checking the password.
    pub async fn deactivate(&self, ctx: &RequestContext, password: Option<&str>) -> AppResult<()> {
        let password = validation::required(
            password,
            "Please provide your password to confirm account deletion",
        )?;
        if !self.hasher.verify_password(password, &ctx.user.password_hash)? {
            return Err(AppError::authentication("Incorrect password"));
        }

        let removed = self
            .users
            .delete(ctx.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Some(avatar) = removed.avatar {
            spawn_avatar_cleanup(self.storage.clone(), avatar);
        }
        info!(user_id = %removed.id, "Account deactivated");
        Ok(())
    }

    async fn discard_avatar(&self, url: &str) {
        if let Err(e) = self.storage.delete_url(url).await {
            warn!(url, error = %e, "Failed to remove avatar object");
        }
    }
}

/// Remove an avatar object in the background. The caller's operation has
/// already succeeded and does not wait for the storage round-trip.
pub(crate) fn spawn_avatar_cleanup(storage: Arc<StorageManager>, url: String) {
    tokio::spawn(async move {
        if let Err(e) = storage.delete_url(&url).await {
            warn!(url = %url, error = %e, "Failed to remove avatar object");
        }
    });
}

/// File extension for a stored avatar, taken from the upload's file name
/// when it has a plain one, otherwise from the MIME type.
fn avatar_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return format!(".{ext}");
    }
    match content_type {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        _ => "",
    }
    .to_string()
}
