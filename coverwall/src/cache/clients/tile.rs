//! Tile cache client for decoded source images.
//!
//! Wraps a generic `Cache` with:
//! - Key translation: source URL → `"tile:{url}"`
//! - Value translation: [`Tile`] ↔ bincode-encoded raw RGB pixels
//!
//! Cache failures never reach the fetcher. Read errors and corrupt entries
//! are logged and treated as a miss; write errors are logged and ignored.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::traits::{Cache, ServiceCacheError};
use crate::tile::Tile;

/// Serialized form of a cached tile.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTile {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Cache client for decoded tiles keyed by source URL.
#[derive(Clone)]
pub struct TileCacheClient {
    cache: Arc<dyn Cache>,
}

impl TileCacheClient {
    /// Create a new tile cache client.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Get a tile from the cache.
    ///
    /// Returns `None` on a miss, a read error or an undecodable entry.
    pub async fn get(&self, url: &str) -> Option<Tile> {
        let key = Self::url_to_key(url);
        match self.cache.get(&key).await {
            Ok(Some(data)) => match Self::decode(&data) {
                Ok(tile) => Some(tile),
                Err(e) => {
                    warn!(error = %e, key = %key, "Discarding corrupt tile cache entry");
                    if let Err(e) = self.cache.delete(&key).await {
                        debug!(error = %e, key = %key, "Failed to delete corrupt entry");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, key = %key, "Tile cache get failed");
                None
            }
        }
    }

    /// Store a tile in the cache.
    pub async fn set(&self, url: &str, tile: &Tile) {
        let key = Self::url_to_key(url);
        let data = match Self::encode(tile) {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to serialize tile");
                return;
            }
        };
        if let Err(e) = self.cache.set(&key, data).await {
            warn!(error = %e, key = %key, "Tile cache set failed");
        }
    }

    /// Check if a tile exists in the cache.
    pub async fn contains(&self, url: &str) -> bool {
        let key = Self::url_to_key(url);
        self.cache.contains(&key).await.unwrap_or(false)
    }

    /// Delete a tile from the cache. Returns whether it existed.
    pub async fn delete(&self, url: &str) -> bool {
        let key = Self::url_to_key(url);
        self.cache.delete(&key).await.unwrap_or(false)
    }

    /// Access the underlying generic cache.
    pub fn inner(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Convert a source URL to a cache key.
    pub fn url_to_key(url: &str) -> String {
        format!("tile:{}", url)
    }

    fn encode(tile: &Tile) -> Result<Vec<u8>, ServiceCacheError> {
        let cached = CachedTile {
            width: tile.width(),
            height: tile.height(),
            pixels: tile.as_raw().to_vec(),
        };
        bincode::serialize(&cached).map_err(|e| ServiceCacheError::Serialization(e.to_string()))
    }

    fn decode(data: &[u8]) -> Result<Tile, ServiceCacheError> {
        let cached: CachedTile = bincode::deserialize(data)
            .map_err(|e| ServiceCacheError::Serialization(e.to_string()))?;
        Tile::from_raw(cached.width, cached.height, cached.pixels).ok_or_else(|| {
            ServiceCacheError::Serialization(format!(
                "pixel buffer does not match {}x{}",
                cached.width, cached.height
            ))
        })
    }
}
