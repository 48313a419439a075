//! Fetch cache for decoded tiles.
//!
//! Memoizes decoded tiles by source URL so repeated compositions over the
//! same URLs skip the network. Failures are never cached.
//!
//! # Layers
//!
//! - [`Cache`]: generic string → bytes interface
//! - [`providers`]: moka-backed memory and file-backed disk implementations
//! - [`CacheService`]: starts a provider and shuts it down cleanly
//! - [`TileCacheClient`]: URL/[`Tile`](crate::tile::Tile) translation on top

pub mod clients;
mod config;
pub mod providers;
mod service;
mod traits;

pub use clients::TileCacheClient;
pub use config::{
    DiskProviderConfig, ProviderConfig, ServiceCacheConfig, DEFAULT_DISK_CACHE_SIZE,
    DEFAULT_GC_INTERVAL, DEFAULT_MEMORY_CACHE_SIZE,
};
pub use providers::{DiskCacheProvider, DiskUsage, MemoryCacheProvider, TieredCache};
pub use service::CacheService;
pub use traits::{BoxFuture, Cache, GcResult, ServiceCacheError};
