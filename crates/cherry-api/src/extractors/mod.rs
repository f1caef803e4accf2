//! Custom Axum extractors.

pub mod auth;
pub mod rejection;

pub use auth::AuthUser;
pub use rejection::{ApiJson, ApiMultipart, ApiPath, ApiQuery};
