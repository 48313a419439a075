//! Cache service lifecycle management.
//!
//! `CacheService` owns a provider and shuts it down cleanly. Application code
//! takes `service.cache()` to build domain clients and calls `shutdown()` on
//! exit so the disk GC daemon stops.
//!
//! ```ignore
//! let memory = CacheService::start(ServiceCacheConfig::memory(256_000_000, None)).await?;
//! let disk = CacheService::start(ServiceCacheConfig::disk(
//!     2_000_000_000,
//!     PathBuf::from("/home/user/.cache/coverwall"),
//!     Duration::from_secs(60),
//! )).await?;
//!
//! memory.shutdown().await;
//! disk.shutdown().await;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::cache::config::{DiskProviderConfig, ProviderConfig, ServiceCacheConfig};
use crate::cache::providers::{DiskCacheProvider, MemoryCacheProvider};
use crate::cache::traits::{Cache, ServiceCacheError};

/// A running cache service that can be shut down.
pub struct CacheService {
    cache: Arc<dyn Cache>,

    /// Set for disk caches so shutdown can stop the GC daemon.
    disk_provider: Option<Arc<DiskCacheProvider>>,
}

impl CacheService {
    /// Start a cache service with the given configuration.
    ///
    /// For disk caches this also starts the GC daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to start (e.g., the disk
    /// directory cannot be created).
    pub async fn start(config: ServiceCacheConfig) -> Result<Self, ServiceCacheError> {
        match config.provider {
            ProviderConfig::Memory { ttl } => {
                let provider = MemoryCacheProvider::new(config.max_size_bytes, ttl);

                info!(
                    max_bytes = config.max_size_bytes,
                    has_ttl = ttl.is_some(),
                    "Memory cache service started"
                );

                Ok(Self {
                    cache: Arc::new(provider),
                    disk_provider: None,
                })
            }

            ProviderConfig::Disk {
                directory,
                gc_interval,
            } => {
                let provider = DiskCacheProvider::start(DiskProviderConfig {
                    directory,
                    max_size_bytes: config.max_size_bytes,
                    gc_interval,
                })
                .await?;

                Ok(Self {
                    cache: Arc::clone(&provider) as Arc<dyn Cache>,
                    disk_provider: Some(provider),
                })
            }
        }
    }

    /// Shared handle to the underlying cache.
    pub fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache)
    }

    /// Returns true if this service is backed by memory.
    pub fn is_memory(&self) -> bool {
        self.disk_provider.is_none()
    }

    /// Returns true if this service is backed by disk.
    pub fn is_disk(&self) -> bool {
        self.disk_provider.is_some()
    }

    /// The disk provider, for disk-specific operations such as `clear()`.
    pub fn disk_provider(&self) -> Option<Arc<DiskCacheProvider>> {
        self.disk_provider.clone()
    }

    /// Shutdown the cache service gracefully.
    ///
    /// Stops the disk GC daemon if there is one. Memory caches need no
    /// cleanup.
    pub async fn shutdown(self) {
        match self.disk_provider {
            Some(provider) => provider.shutdown().await,
            None => info!("Memory cache service shutdown (no-op)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_start_memory_service() {
        let service = CacheService::start(ServiceCacheConfig::memory(1_000_000, None))
            .await
            .unwrap();
        assert!(service.is_memory());
        assert!(!service.is_disk());

        let cache = service.cache();
        cache.set("key", vec![1, 2, 3]).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(vec![1, 2, 3]));

        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_disk_service() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("nested").join("cache");

        let service = CacheService::start(ServiceCacheConfig::disk(
            1_000_000,
            directory.clone(),
            Duration::from_secs(3600),
        ))
        .await
        .unwrap();

        assert!(service.is_disk());
        assert!(directory.is_dir());

        let cache = service.cache();
        cache.set("key", vec![4, 5, 6]).await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), Some(vec![4, 5, 6]));

        service.shutdown().await;
    }
}
