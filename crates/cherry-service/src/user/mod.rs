//! User self-service and admin user management services.

pub mod admin;
pub mod bootstrap;
pub mod service;

pub use admin::{AdminUpdateUserRequest, AdminUserService};
pub use bootstrap::ensure_bootstrap_admin;
pub use service::{AvatarUpload, UpdateProfileRequest, UserService};
