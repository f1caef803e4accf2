//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use cherry_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, RbacEnforcer};
use cherry_core::config::AppConfig;
use cherry_core::result::AppResult;
use cherry_core::traits::Mailer;
use cherry_database::Stores;
use cherry_service::{
    AdminUserService, AnnouncementService, AuthService, AuthSettings, UserService, build_mailer,
    ensure_bootstrap_admin,
};
use cherry_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration, immutable after startup.
    pub config: Arc<AppConfig>,
    /// Credential and announcement stores.
    pub stores: Stores,
    /// Avatar object storage.
    pub storage: Arc<StorageManager>,
    /// Identity, sign-in, and password flows.
    pub auth: Arc<AuthService>,
    /// Self-service profile operations.
    pub users: Arc<UserService>,
    /// Admin user management.
    pub admin_users: Arc<AdminUserService>,
    /// Announcement management and the public feed.
    pub announcements: Arc<AnnouncementService>,
}

impl AppState {
    /// Wire services over the given stores and mail transport.
    pub async fn new(
        config: AppConfig,
        stores: Stores,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        let storage = Arc::new(StorageManager::from_config(&config.storage).await?);

        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&config.auth));
        let rbac = Arc::new(RbacEnforcer::new());

        let auth = Arc::new(AuthService::new(
            Arc::clone(&stores.users),
            mailer,
            Arc::clone(&hasher),
            validator,
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
            Arc::clone(&rbac),
            AuthSettings::from_config(&config),
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&storage),
            hasher,
            config.storage.max_avatar_bytes,
        ));
        let admin_users = Arc::new(AdminUserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&storage),
            Arc::clone(&rbac),
        ));
        let announcements = Arc::new(AnnouncementService::new(
            Arc::clone(&stores.announcements),
            Arc::clone(&stores.users),
            rbac,
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            storage,
            auth,
            users,
            admin_users,
            announcements,
        })
    }
}

/// Connect stores, provision the bootstrap admin, and build the state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let stores = Stores::from_config(&config.database).await?;

    ensure_bootstrap_admin(
        stores.users.as_ref(),
        &PasswordHasher::new(),
        &PasswordValidator::new(&config.auth),
        &config.auth,
    )
    .await?;

    let mailer = build_mailer(&config.mail)?;
    AppState::new(config, stores, mailer).await
}
