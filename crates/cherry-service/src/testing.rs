//! Shared fixtures for service tests: every service wired to in-memory
//! stores, the memory mailer, and local storage in a temp directory.

use std::sync::Arc;

use cherry_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, RbacEnforcer};
use cherry_core::config::{AppConfig, LocalStorageConfig};
use cherry_database::Stores;
use cherry_entity::user::{NewUser, User, UserRole};
use cherry_storage::StorageManager;

use crate::announcement::AnnouncementService;
use crate::auth::{AuthService, AuthSettings};
use crate::context::RequestContext;
use crate::mail::MemoryMailer;
use crate::user::{AdminUserService, UserService};

/// Password given to every fixture account.
pub const PASSWORD: &str = "secret1";

pub struct Harness {
    pub stores: Stores,
    pub mailer: Arc<MemoryMailer>,
    pub storage: Arc<StorageManager>,
    pub auth: AuthService,
    pub users: UserService,
    pub admin_users: AdminUserService,
    pub announcements: AnnouncementService,
    hasher: Arc<PasswordHasher>,
    _dir: tempfile::TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "service-test-secret".to_string();
        config.storage.local = LocalStorageConfig {
            root_path: dir.path().to_string_lossy().into_owned(),
            public_base_url: "/uploads".to_string(),
        };

        let stores = Stores::memory();
        let mailer = Arc::new(MemoryMailer::new());
        let storage = Arc::new(StorageManager::from_config(&config.storage).await.unwrap());
        let hasher = Arc::new(PasswordHasher::new());
        let rbac = Arc::new(RbacEnforcer::new());

        let auth = AuthService::new(
            stores.users.clone(),
            mailer.clone(),
            hasher.clone(),
            Arc::new(PasswordValidator::new(&config.auth)),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::new(JwtDecoder::new(&config.auth)),
            rbac.clone(),
            AuthSettings::from_config(&config),
        );
        let users = UserService::new(
            stores.users.clone(),
            storage.clone(),
            hasher.clone(),
            config.storage.max_avatar_bytes,
        );
        let admin_users =
            AdminUserService::new(stores.users.clone(), storage.clone(), rbac.clone());
        let announcements =
            AnnouncementService::new(stores.announcements.clone(), stores.users.clone(), rbac);

        Self {
            stores,
            mailer,
            storage,
            auth,
            users,
            admin_users,
            announcements,
            hasher,
            _dir: dir,
        }
    }

    async fn account(&self, email: &str, role: UserRole) -> User {
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.stores
            .users
            .create(&NewUser {
                email: email.to_string(),
                password_hash: self.hasher.hash_password(PASSWORD).unwrap(),
                name,
                role,
            })
            .await
            .unwrap()
    }

    pub async fn user(&self, email: &str) -> User {
        self.account(email, UserRole::User).await
    }

    pub async fn admin(&self, email: &str) -> User {
        self.account(email, UserRole::Admin).await
    }

    /// Context for `user` as the access gate would build it: freshly read.
    pub async fn context(&self, user: &User) -> RequestContext {
        let current = self.stores.users.find_by_id(user.id).await.unwrap().unwrap();
        RequestContext::new(current)
    }
}
