//! Cache provider implementations.
//!
//! Each provider implements the `Cache` trait and manages its own eviction.
//! Providers are normally created through `CacheService::start()`.
//!
//! - [`MemoryCacheProvider`]: in-memory LRU cache using moka
//! - [`DiskCacheProvider`]: on-disk cache with a background GC daemon
//! - [`TieredCache`]: one provider in front of another

mod disk;
mod memory;
mod tiered;

pub use disk::{DiskCacheProvider, DiskUsage};
pub use memory::MemoryCacheProvider;
pub use tiered::TieredCache;
