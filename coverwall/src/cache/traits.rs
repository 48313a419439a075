//! Core traits for the fetch cache.
//!
//! The `Cache` trait is a plain key-value interface. Providers (memory, disk)
//! implement it; domain clients such as
//! [`TileCacheClient`](super::clients::TileCacheClient) translate URLs and
//! tiles into keys and bytes on top of it.
//!
//! # Example
//!
//! ```ignore
//! use coverwall::cache::{CacheService, ServiceCacheConfig};
//!
//! let service = CacheService::start(ServiceCacheConfig::memory(256 * 1024 * 1024, None)).await?;
//!
//! let cache = service.cache();
//! cache.set("key", vec![1, 2, 3]).await?;
//! let value = cache.get("key").await?;
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Result of a garbage collection operation.
#[derive(Debug, Clone, Default)]
pub struct GcResult {
    /// Number of entries removed during GC.
    pub entries_removed: usize,
    /// Total bytes freed during GC.
    pub bytes_freed: u64,
    /// Duration of the GC operation in milliseconds.
    pub duration_ms: u64,
}

impl fmt::Display for GcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GC: removed {} entries, freed {} bytes in {}ms",
            self.entries_removed, self.bytes_freed, self.duration_ms
        )
    }
}

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum ServiceCacheError {
    /// I/O error during cache operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache service is shutting down.
    #[error("Cache is shutting down")]
    ShuttingDown,

    /// Failed to spawn background task.
    #[error("Failed to spawn task: {0}")]
    SpawnError(String),

    /// Provider-specific error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// A cached value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic cache interface for key-value storage.
///
/// Keys are human-readable strings so entries can be traced in logs; values
/// are raw bytes so providers carry no serialization opinions.
///
/// Each provider owns its eviction strategy: the memory provider relies on
/// moka's size-weighted LRU, the disk provider runs a background GC daemon.
/// `gc()` forces a cycle.
///
/// Methods return [`BoxFuture`] so the trait stays usable as `Arc<dyn Cache>`.
pub trait Cache: Send + Sync {
    /// Store a value with the given key, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns `ServiceCacheError` if I/O fails or the cache is shutting down.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(data))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>>;

    /// Delete a value by key. Returns whether the key existed.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>>;

    /// Current size of the cache in bytes.
    fn size_bytes(&self) -> u64;

    /// Current number of entries in the cache.
    fn entry_count(&self) -> u64;

    /// Maximum configured size in bytes.
    fn max_size_bytes(&self) -> u64;

    /// Trigger garbage collection manually.
    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>>;
}
