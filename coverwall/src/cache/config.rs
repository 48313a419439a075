//! Configuration types for the cache service.

use std::path::PathBuf;
use std::time::Duration;

/// Default memory cache size (256 MB).
pub const DEFAULT_MEMORY_CACHE_SIZE: u64 = 256 * 1024 * 1024;

/// Default disk cache size (2 GB).
pub const DEFAULT_DISK_CACHE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Default interval between disk GC checks.
pub const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for creating a cache service.
#[derive(Debug, Clone)]
pub struct ServiceCacheConfig {
    /// Maximum size in bytes.
    pub max_size_bytes: u64,

    /// Provider-specific settings.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    /// In-memory cache using moka.
    Memory {
        /// Optional time-to-live for entries. `None` means LRU eviction only.
        ttl: Option<Duration>,
    },

    /// On-disk cache with background garbage collection.
    Disk {
        /// Directory for cache storage.
        directory: PathBuf,

        /// Interval between GC checks.
        gc_interval: Duration,
    },
}

impl ServiceCacheConfig {
    /// Create a memory cache configuration.
    ///
    /// ```ignore
    /// let config = ServiceCacheConfig::memory(256 * 1024 * 1024, None);
    /// ```
    pub fn memory(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        Self {
            max_size_bytes,
            provider: ProviderConfig::Memory { ttl },
        }
    }

    /// Create a disk cache configuration.
    ///
    /// ```ignore
    /// let config = ServiceCacheConfig::disk(
    ///     2 * 1024 * 1024 * 1024,
    ///     PathBuf::from("/home/user/.cache/coverwall"),
    ///     Duration::from_secs(60),
    /// );
    /// ```
    pub fn disk(max_size_bytes: u64, directory: PathBuf, gc_interval: Duration) -> Self {
        Self {
            max_size_bytes,
            provider: ProviderConfig::Disk {
                directory,
                gc_interval,
            },
        }
    }
}

impl Default for ServiceCacheConfig {
    /// 256 MB memory cache with no TTL.
    fn default() -> Self {
        Self::memory(DEFAULT_MEMORY_CACHE_SIZE, None)
    }
}

/// Settings for a disk cache provider, extracted from [`ProviderConfig::Disk`].
#[derive(Debug, Clone)]
pub struct DiskProviderConfig {
    /// Cache directory path.
    pub directory: PathBuf,

    /// Maximum size in bytes.
    pub max_size_bytes: u64,

    /// Interval between GC checks.
    pub gc_interval: Duration,
}

impl DiskProviderConfig {
    /// Returns `Some` if `config` describes a disk provider.
    pub fn from_service_config(config: &ServiceCacheConfig) -> Option<Self> {
        match &config.provider {
            ProviderConfig::Disk {
                directory,
                gc_interval,
            } => Some(Self {
                directory: directory.clone(),
                max_size_bytes: config.max_size_bytes,
                gc_interval: *gc_interval,
            }),
            ProviderConfig::Memory { .. } => None,
        }
    }
}
