//! Application bootstrap implementation.
//!
//! `CoverwallApp` starts the cache services before anything that depends on
//! them, wires the shared HTTP client, fetcher and pipeline together, and
//! shuts the caches down in order.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{Cache, CacheService, DiskCacheProvider, TieredCache, TileCacheClient};
use crate::encode::JpegEncoder;
use crate::fetch::TileFetcher;
use crate::http::AsyncReqwestClient;
use crate::pipeline::{MosaicError, MosaicPipeline, PipelineOutput};
use crate::tile::SourceUrl;

/// The pipeline type the application runs.
pub type AppPipeline = MosaicPipeline<AsyncReqwestClient>;

/// Coverwall application with service lifecycle management.
///
/// Start order:
/// 1. Memory cache service
/// 2. Disk cache service (spawns its GC daemon)
/// 3. HTTP client, fetcher and pipeline on top of the caches
///
/// ```ignore
/// use coverwall::app::{AppConfig, CoverwallApp};
///
/// let app = CoverwallApp::start(config).await?;
/// let image = app.pipeline().run(&urls).await?;
/// app.shutdown().await;
/// ```
pub struct CoverwallApp {
    memory_cache_service: Option<CacheService>,
    disk_cache_service: Option<CacheService>,
    tile_cache: Option<TileCacheClient>,
    pipeline: Arc<AppPipeline>,
    config: AppConfig,

    /// Owned runtime when created via `start_sync()`.
    runtime: Option<Runtime>,
}

impl CoverwallApp {
    /// Start the application on the caller's runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if a cache service fails to start, the HTTP client
    /// cannot be built or the encoder settings are invalid.
    pub async fn start(config: AppConfig) -> Result<Self, AppError> {
        info!(
            cache_enabled = config.cache_enabled(),
            columns = config.pipeline.columns.get(),
            policy = %config.pipeline.policy,
            "Starting coverwall"
        );

        // Validate before any service is started
        let encoder = JpegEncoder::new(config.quality)?;

        let memory_cache_service = match config.memory_service_config() {
            Some(memory_config) => {
                let service = CacheService::start(memory_config)
                    .await
                    .map_err(AppError::MemoryCacheStart)?;
                Some(service)
            }
            None => None,
        };

        let disk_cache_service = match config.disk_service_config() {
            Some(disk_config) => match CacheService::start(disk_config).await {
                Ok(service) => Some(service),
                Err(e) => {
                    if let Some(memory) = memory_cache_service {
                        memory.shutdown().await;
                    }
                    return Err(AppError::DiskCacheStart(e));
                }
            },
            None => None,
        };

        let tile_cache = Self::tile_cache_for(&memory_cache_service, &disk_cache_service);

        let client = match AsyncReqwestClient::with_config(&config.http) {
            Ok(client) => client,
            Err(e) => {
                Self::shutdown_services(memory_cache_service, disk_cache_service).await;
                return Err(e.into());
            }
        };

        let mut fetcher = TileFetcher::new(Arc::new(client));
        if let Some(cache) = &tile_cache {
            fetcher = fetcher.with_cache(cache.clone());
        }

        let pipeline = MosaicPipeline::new(fetcher, config.pipeline.clone())
            .with_encoder(Arc::new(encoder));

        info!(
            timeout_secs = config.http.timeout.as_secs(),
            quality = config.quality,
            "Coverwall ready"
        );

        Ok(Self {
            memory_cache_service,
            disk_cache_service,
            tile_cache,
            pipeline: Arc::new(pipeline),
            config,
            runtime: None,
        })
    }

    /// Start the application on a runtime it owns.
    ///
    /// For synchronous callers such as CLI commands. The runtime lives as
    /// long as the app so the disk GC daemon keeps running.
    pub fn start_sync(config: AppConfig) -> Result<Self, AppError> {
        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        let mut app = runtime.block_on(Self::start(config))?;
        app.runtime = Some(runtime);

        Ok(app)
    }

    /// Memory cache first, disk behind it, or whichever one exists.
    fn tile_cache_for(
        memory: &Option<CacheService>,
        disk: &Option<CacheService>,
    ) -> Option<TileCacheClient> {
        let cache: Arc<dyn Cache> = match (memory, disk) {
            (Some(memory), Some(disk)) => Arc::new(TieredCache::new(memory.cache(), disk.cache())),
            (Some(memory), None) => memory.cache(),
            (None, Some(disk)) => disk.cache(),
            (None, None) => return None,
        };
        Some(TileCacheClient::new(cache))
    }

    /// The shared composition pipeline.
    pub fn pipeline(&self) -> Arc<AppPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// The application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The tile cache, if caching is enabled.
    pub fn tile_cache(&self) -> Option<&TileCacheClient> {
        self.tile_cache.as_ref()
    }

    /// The disk cache provider, if the disk tier is enabled.
    pub fn disk_cache(&self) -> Option<Arc<DiskCacheProvider>> {
        self.disk_cache_service
            .as_ref()
            .and_then(CacheService::disk_provider)
    }

    /// Compose on the owned runtime.
    ///
    /// # Errors
    ///
    /// Returns `MosaicError::Internal` if the app was started with
    /// [`start`](Self::start) rather than [`start_sync`](Self::start_sync).
    pub fn compose_blocking(
        &self,
        urls: &[SourceUrl],
        cancel: &CancellationToken,
    ) -> Result<PipelineOutput, MosaicError> {
        self.block_on(self.pipeline.run_with_report(urls, cancel))
            .ok_or_else(|| MosaicError::Internal("no owned runtime".to_string()))?
    }

    fn block_on<F: Future>(&self, future: F) -> Option<F::Output> {
        self.runtime.as_ref().map(|runtime| runtime.block_on(future))
    }

    /// Shut down cache services gracefully.
    pub async fn shutdown(self) {
        info!("Shutting down coverwall");
        Self::shutdown_services(self.memory_cache_service, self.disk_cache_service).await;
    }

    /// Shut down an app created with [`start_sync`](Self::start_sync).
    pub fn shutdown_sync(mut self) {
        match self.runtime.take() {
            Some(runtime) => runtime.block_on(self.shutdown()),
            None => info!("shutdown_sync called without an owned runtime"),
        }
    }

    async fn shutdown_services(memory: Option<CacheService>, disk: Option<CacheService>) {
        if let Some(disk) = disk {
            disk.shutdown().await;
        }
        if let Some(memory) = memory {
            memory.shutdown().await;
        }
    }
}
