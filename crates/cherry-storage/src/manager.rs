//! Storage manager: owns the configured provider and maps object keys to
//! public URLs and back.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use cherry_core::config::{StorageConfig, StorageProviderKind};
use cherry_core::error::AppError;
use cherry_core::result::AppResult;
use cherry_core::traits::StorageProvider;

use crate::providers::LocalStorageProvider;

/// Front door to the configured object storage provider.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
}

impl StorageManager {
    /// Wrap an existing provider.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Build the provider selected by `storage.provider`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let provider: Arc<dyn StorageProvider> = match config.provider {
            StorageProviderKind::Local => Arc::new(
                LocalStorageProvider::new(&config.local.root_path, &config.local.public_base_url)
                    .await?,
            ),
            #[cfg(feature = "s3")]
            StorageProviderKind::S3 => {
                Arc::new(crate::providers::S3StorageProvider::new(&config.s3).await?)
            }
            #[cfg(not(feature = "s3"))]
            StorageProviderKind::S3 => {
                return Err(AppError::configuration(
                    "storage.provider = \"s3\" requires building with the `s3` feature",
                ));
            }
        };
        info!(provider = provider.provider_type(), "Storage provider ready");
        Ok(Self { provider })
    }

    /// The active provider.
    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Store an object and return its public URL.
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        self.provider.put(key, data, content_type).await?;
        Ok(self.public_url(key))
    }

    /// Delete an object by key.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        self.provider.delete(key).await
    }

    /// Delete the object a public URL points at. URLs that do not belong to
    /// this provider are rejected.
    pub async fn delete_url(&self, url: &str) -> AppResult<()> {
        let key = self
            .key_from_url(url)
            .ok_or_else(|| AppError::storage(format!("URL is not managed by this store: {url}")))?;
        self.provider.delete(&key).await
    }

    /// Public URL for `key`.
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.provider.public_base_url(),
            key.trim_start_matches('/')
        )
    }

    /// Recover the object key from a public URL issued by [`Self::public_url`].
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(self.provider.public_base_url())?;
        let key = rest.strip_prefix('/')?;
        (!key.is_empty()).then(|| key.to_string())
    }

    /// Check provider health.
    pub async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }
}
