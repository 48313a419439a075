//! In-memory cache provider using moka.
//!
//! Wraps `moka::future::Cache` with entries weighted by their byte length, so
//! the configured limit bounds memory rather than entry count. Eviction is
//! automatic; `gc()` only runs moka's pending maintenance.

use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;

use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

/// In-memory cache provider with size-weighted LRU eviction.
pub struct MemoryCacheProvider {
    cache: MokaCache<String, Vec<u8>>,
    max_size_bytes: u64,
}

impl MemoryCacheProvider {
    /// Create a new memory cache provider.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total weight of all entries
    /// * `ttl` - Optional time-to-live for entries
    pub fn new(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder()
            // moka weights are u32; saturate for oversized entries
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes);

        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
            max_size_bytes,
        }
    }
}

impl Cache for MemoryCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.cache.insert(key, value).await;
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.get(&key).await) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.remove(&key).await.is_some()) })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.cache.contains_key(&key)) })
    }

    fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move {
            let start = Instant::now();
            let size_before = self.cache.weighted_size();
            let count_before = self.cache.entry_count();

            self.cache.run_pending_tasks().await;

            Ok(GcResult {
                entries_removed: count_before.saturating_sub(self.cache.entry_count()) as usize,
                bytes_freed: size_before.saturating_sub(self.cache.weighted_size()),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_memory_provider_new() {
        let provider = MemoryCacheProvider::new(1_000_000, None);
        assert_eq!(provider.max_size_bytes(), 1_000_000);
        assert_eq!(provider.entry_count(), 0);
        assert_eq!(provider.size_bytes(), 0);
    }

    #[tokio::test]
    async fn test_memory_provider_set_and_get() {
        let provider = MemoryCacheProvider::new(1_000_000, None);

        provider.set("tile:http://a", vec![1, 2, 3]).await.unwrap();

        let value = provider.get("tile:http://a").await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_memory_provider_get_missing() {
        let provider = MemoryCacheProvider::new(1_000_000, None);
        assert!(provider.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_delete() {
        let provider = MemoryCacheProvider::new(1_000_000, None);

        provider.set("key1", vec![1, 2, 3]).await.unwrap();
        assert!(provider.delete("key1").await.unwrap());
        assert!(!provider.contains("key1").await.unwrap());
        assert!(!provider.delete("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_provider_size_tracking() {
        let provider = MemoryCacheProvider::new(1_000_000, None);

        provider.set("key1", vec![0u8; 1000]).await.unwrap();
        provider.set("key2", vec![0u8; 2000]).await.unwrap();
        provider.gc().await.unwrap();

        let size = provider.size_bytes();
        assert!(size >= 3000, "Expected size >= 3000, got {}", size);
    }

    #[tokio::test]
    async fn test_memory_provider_replace_existing() {
        let provider = MemoryCacheProvider::new(1_000_000, None);

        provider.set("key1", vec![1, 2, 3]).await.unwrap();
        provider.set("key1", vec![4, 5, 6, 7]).await.unwrap();
        provider.gc().await.unwrap();

        assert_eq!(provider.get("key1").await.unwrap(), Some(vec![4, 5, 6, 7]));
        assert_eq!(provider.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_provider_with_ttl() {
        let provider = MemoryCacheProvider::new(1_000_000, Some(Duration::from_millis(50)));

        provider.set("key1", vec![1, 2, 3]).await.unwrap();
        assert!(provider.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;
        provider.gc().await.unwrap();

        assert!(provider.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_lru_eviction() {
        let provider = MemoryCacheProvider::new(2500, None);

        provider.set("key1", vec![0u8; 1000]).await.unwrap();
        provider.set("key2", vec![0u8; 1000]).await.unwrap();
        provider.set("key3", vec![0u8; 1000]).await.unwrap();

        provider.gc().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        provider.gc().await.unwrap();

        assert!(
            provider.size_bytes() <= 2500,
            "Expected size <= 2500, got {}",
            provider.size_bytes()
        );
    }

    #[tokio::test]
    async fn test_memory_provider_concurrent_access() {
        let provider = Arc::new(MemoryCacheProvider::new(10_000_000, None));
        let mut handles = Vec::new();

        for i in 0..50 {
            let provider = Arc::clone(&provider);
            handles.push(tokio::spawn(async move {
                let key = format!("tile:http://host/{}.jpg", i);
                let data = vec![i as u8; 100];

                provider.set(&key, data.clone()).await.unwrap();
                assert_eq!(provider.get(&key).await.unwrap(), Some(data));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        provider.gc().await.unwrap();
        assert_eq!(provider.entry_count(), 50);
    }
}
