//! Application configuration for `CoverwallApp`.
//!
//! `AppConfig` gathers everything needed to bootstrap: HTTP client settings,
//! pipeline settings, encoder quality and the two optional cache tiers.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{
    ServiceCacheConfig, DEFAULT_DISK_CACHE_SIZE, DEFAULT_GC_INTERVAL, DEFAULT_MEMORY_CACHE_SIZE,
};
use crate::config::ConfigFile;
use crate::encode::DEFAULT_JPEG_QUALITY;
use crate::http::HttpClientConfig;
use crate::pipeline::PipelineConfig;

use super::error::AppError;

/// Top-level configuration passed to `CoverwallApp::start()`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP client settings shared by every fetch.
    pub http: HttpClientConfig,

    /// Composition settings.
    pub pipeline: PipelineConfig,

    /// JPEG quality (1-100).
    pub quality: u8,

    /// Memory cache tier; `None` disables it.
    pub memory_cache: Option<MemoryCacheAppConfig>,

    /// Disk cache tier; `None` disables it.
    pub disk_cache: Option<DiskCacheAppConfig>,
}

/// Memory cache configuration for the application.
#[derive(Clone, Debug)]
pub struct MemoryCacheAppConfig {
    /// Maximum cache size in bytes.
    pub max_size_bytes: u64,
}

impl Default for MemoryCacheAppConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MEMORY_CACHE_SIZE,
        }
    }
}

/// Disk cache configuration for the application.
#[derive(Clone, Debug)]
pub struct DiskCacheAppConfig {
    /// Root directory for cached tiles.
    pub directory: PathBuf,

    /// Maximum cache size in bytes.
    pub max_size_bytes: u64,

    /// How often the GC daemon checks the size limit.
    pub gc_interval: Duration,
}

impl DiskCacheAppConfig {
    /// Create a disk cache config with default size and GC interval.
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            max_size_bytes: DEFAULT_DISK_CACHE_SIZE,
            gc_interval: DEFAULT_GC_INTERVAL,
        }
    }

    /// Set the maximum cache size.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Set the GC interval.
    pub fn with_gc_interval(mut self, interval: Duration) -> Self {
        self.gc_interval = interval;
        self
    }
}

impl Default for AppConfig {
    /// Defaults with caching disabled.
    fn default() -> Self {
        Self {
            http: HttpClientConfig::default(),
            pipeline: PipelineConfig::default(),
            quality: DEFAULT_JPEG_QUALITY,
            memory_cache: None,
            disk_cache: None,
        }
    }
}

impl AppConfig {
    /// Build the application config from the user's config file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for values the file parser accepts but the
    /// pipeline cannot use.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, AppError> {
        let columns = NonZeroUsize::new(config.mosaic.columns)
            .ok_or_else(|| AppError::Config("mosaic.columns must be at least 1".to_string()))?;

        let deadline = match config.fetch.deadline {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let pipeline = PipelineConfig::default()
            .with_columns(columns)
            .with_policy(config.mosaic.composition_policy())
            .with_max_concurrent(config.fetch.workers)
            .with_deadline(deadline)
            .with_fingerprint(config.encode.fingerprint)
            .with_cache_lifetime(Duration::from_secs(
                config.encode.cache_lifetime_days.saturating_mul(86_400),
            ));

        let http = HttpClientConfig::default()
            .with_timeout(Duration::from_secs(config.fetch.timeout))
            .with_user_agent(config.fetch.user_agent.clone());

        let (memory_cache, disk_cache) = if config.cache.enabled {
            (
                Some(MemoryCacheAppConfig {
                    max_size_bytes: config.cache.memory_size,
                }),
                Some(
                    DiskCacheAppConfig::new(config.cache.directory.clone())
                        .with_max_size(config.cache.disk_size),
                ),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            http,
            pipeline,
            quality: config.encode.quality,
            memory_cache,
            disk_cache,
        })
    }

    /// Disable both cache tiers.
    pub fn without_cache(mut self) -> Self {
        self.memory_cache = None;
        self.disk_cache = None;
        self
    }

    /// Whether any cache tier is configured.
    pub fn cache_enabled(&self) -> bool {
        self.memory_cache.is_some() || self.disk_cache.is_some()
    }

    pub(crate) fn memory_service_config(&self) -> Option<ServiceCacheConfig> {
        self.memory_cache
            .as_ref()
            .map(|memory| ServiceCacheConfig::memory(memory.max_size_bytes, None))
    }

    pub(crate) fn disk_service_config(&self) -> Option<ServiceCacheConfig> {
        self.disk_cache.as_ref().map(|disk| {
            ServiceCacheConfig::disk(disk.max_size_bytes, disk.directory.clone(), disk.gc_interval)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::FingerprintStrategy;
    use crate::mosaic::CompositionPolicy;

    #[test]
    fn test_default_has_no_cache() {
        let config = AppConfig::default();
        assert!(!config.cache_enabled());
        assert!(config.memory_service_config().is_none());
        assert!(config.disk_service_config().is_none());
    }

    #[test]
    fn test_from_default_config_file() {
        let config = AppConfig::from_config_file(&ConfigFile::default()).unwrap();

        assert_eq!(config.pipeline.columns.get(), 10);
        assert_eq!(config.pipeline.policy, CompositionPolicy::CenterCrop);
        assert_eq!(config.pipeline.deadline, Some(Duration::from_secs(120)));
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert_eq!(config.quality, 90);
        assert!(config.cache_enabled());
        assert_eq!(
            config.pipeline.cache_lifetime,
            Duration::from_secs(28 * 86_400)
        );
    }

    #[test]
    fn test_from_config_file_overrides() {
        let mut file = ConfigFile::default();
        file.fetch.deadline = 0;
        file.fetch.workers = 3;
        file.mosaic.policy = CompositionPolicy::canonical();
        file.encode.fingerprint = FingerprintStrategy::EncodedBytes;
        file.cache.enabled = false;

        let config = AppConfig::from_config_file(&file).unwrap();

        assert_eq!(config.pipeline.deadline, None);
        assert_eq!(config.pipeline.max_concurrent, 3);
        assert_eq!(config.pipeline.policy, CompositionPolicy::canonical());
        assert_eq!(config.pipeline.fingerprint, FingerprintStrategy::EncodedBytes);
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_zero_columns_rejected() {
        let mut file = ConfigFile::default();
        file.mosaic.columns = 0;

        assert!(matches!(
            AppConfig::from_config_file(&file),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_disk_cache_builder() {
        let disk = DiskCacheAppConfig::new(PathBuf::from("/cache"))
            .with_max_size(1024)
            .with_gc_interval(Duration::from_secs(5));

        assert_eq!(disk.max_size_bytes, 1024);
        assert_eq!(disk.gc_interval, Duration::from_secs(5));
    }
}
