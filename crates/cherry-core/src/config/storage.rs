//! `[storage]` section: where avatars live and how big they may be.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// Local filesystem, served under `local.public_base_url`.
    #[default]
    Local,
    /// S3-compatible bucket. Needs the `s3` feature.
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub provider: StorageProviderKind,
    /// Largest accepted avatar upload.
    pub max_avatar_bytes: u64,
    pub local: LocalStorageConfig,
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::Local,
            max_avatar_bytes: 5 * 1024 * 1024,
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalStorageConfig {
    /// Directory objects are written under. Created on startup.
    pub root_path: String,
    /// URL path the directory is served at.
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: "./uploads".into(),
            public_base_url: "/uploads".into(),
        }
    }
}

/// Bucket settings. An empty `endpoint` means AWS itself; MinIO and other
/// compatible services set it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Derived from endpoint and bucket when empty.
    pub public_base_url: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: "us-east-1".into(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            public_base_url: String::new(),
        }
    }
}
