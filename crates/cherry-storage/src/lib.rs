//! # cherry-storage
//!
//! Object storage for uploaded avatars. Supports the local filesystem and,
//! with the `s3` feature, S3-compatible object stores.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
