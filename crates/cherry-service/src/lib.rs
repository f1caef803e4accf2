//! # cherry-service
//!
//! Business logic for the Cherry Studio API. Each service orchestrates the
//! stores, object storage, mail transport, and authentication primitives to
//! implement one group of use cases.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time via `Arc` references. Admin operations check the
//! caller's capability before touching any data.

pub mod announcement;
pub mod auth;
pub mod context;
pub mod mail;
pub mod query;
pub mod user;
pub mod validation;

#[cfg(test)]
mod testing;

pub use announcement::AnnouncementService;
pub use auth::{AuthService, AuthSession, AuthSettings};
pub use context::RequestContext;
pub use mail::build_mailer;
pub use user::{AdminUserService, UserService, ensure_bootstrap_admin};
