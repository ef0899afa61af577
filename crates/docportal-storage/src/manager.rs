//! Storage manager: the façade services use for blob operations.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use docportal_core::config::StorageConfig;
use docportal_core::result::AppResult;
use docportal_core::traits::storage::{ByteStream, StorageProvider};

use crate::providers::LocalStorageProvider;

/// Holds the active storage provider and adds the multi-blob operations
/// the document services need.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
}

impl StorageManager {
    /// Wrap an existing provider.
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Build the manager described by configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let provider = LocalStorageProvider::new(&config.root_path).await?;
        info!(root = %config.root_path, "Local blob storage ready");
        Ok(Self::new(Arc::new(provider)))
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Store a blob.
    pub async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.provider.write(path, data).await
    }

    /// Store a blob, then run `record` to persist whatever refers to it.
    ///
    /// When `record` fails the blob is removed again and the recording
    /// error is returned, so no blob outlives a rejected row.
    pub async fn put_then<T, F, Fut>(&self, path: &str, data: Bytes, record: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        self.provider.write(path, data).await?;
        match record().await {
            Ok(value) => Ok(value),
            Err(e) => {
                if let Err(cleanup) = self.provider.delete(path).await {
                    warn!(path, error = %cleanup, "Failed to remove blob of rejected write");
                }
                Err(e)
            }
        }
    }

    /// Open a blob for streaming.
    pub async fn open(&self, path: &str) -> AppResult<ByteStream> {
        self.provider.read(path).await
    }

    /// Remove a blob.
    pub async fn remove(&self, path: &str) -> AppResult<()> {
        self.provider.delete(path).await
    }

    /// Remove many blobs after their rows are gone.
    ///
    /// Failures are logged and counted rather than returned: the rows are
    /// already committed, and an orphaned blob does not affect the portal.
    /// Returns the number of blobs that could not be removed.
    pub async fn remove_all<I, S>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failed = 0;
        for path in paths {
            let path = path.as_ref();
            if let Err(e) = self.provider.delete(path).await {
                failed += 1;
                warn!(path, error = %e, "Failed to remove blob; it is now orphaned");
            }
        }
        failed
    }

    /// Check whether the provider is reachable.
    pub async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }
}
