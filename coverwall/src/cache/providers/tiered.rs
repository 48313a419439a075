//! Two-tier cache: a fast front tier over a durable back tier.
//!
//! Reads check the front tier first and promote back-tier hits. Writes go to
//! both tiers. Used by the app to put the memory provider in front of the
//! disk provider.

use std::sync::Arc;

use tracing::debug;

use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

/// Front tier over back tier. Sizes and counts are summed across tiers.
pub struct TieredCache {
    front: Arc<dyn Cache>,
    back: Arc<dyn Cache>,
}

impl TieredCache {
    /// Create a tiered cache.
    pub fn new(front: Arc<dyn Cache>, back: Arc<dyn Cache>) -> Self {
        Self { front, back }
    }
}

impl Cache for TieredCache {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if let Err(e) = self.front.set(&key, value.clone()).await {
                debug!(error = %e, key = %key, "Front tier set failed");
            }
            self.back.set(&key, value).await
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            match self.front.get(&key).await {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {}
                Err(e) => debug!(error = %e, key = %key, "Front tier get failed"),
            }

            let value = self.back.get(&key).await?;
            if let Some(value) = &value {
                if let Err(e) = self.front.set(&key, value.clone()).await {
                    debug!(error = %e, key = %key, "Promotion to front tier failed");
                }
            }
            Ok(value)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            let in_front = self.front.delete(&key).await.unwrap_or(false);
            let in_back = self.back.delete(&key).await?;
            Ok(in_front || in_back)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            if self.front.contains(&key).await.unwrap_or(false) {
                return Ok(true);
            }
            self.back.contains(&key).await
        })
    }

    fn size_bytes(&self) -> u64 {
        self.front.size_bytes() + self.back.size_bytes()
    }

    fn entry_count(&self) -> u64 {
        self.front.entry_count() + self.back.entry_count()
    }

    fn max_size_bytes(&self) -> u64 {
        self.front.max_size_bytes() + self.back.max_size_bytes()
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move {
            let front = self.front.gc().await?;
            let back = self.back.gc().await?;
            Ok(GcResult {
                entries_removed: front.entries_removed + back.entries_removed,
                bytes_freed: front.bytes_freed + back.bytes_freed,
                duration_ms: front.duration_ms + back.duration_ms,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::providers::MemoryCacheProvider;

    fn tiers() -> (Arc<dyn Cache>, Arc<dyn Cache>) {
        (
            Arc::new(MemoryCacheProvider::new(1_000_000, None)),
            Arc::new(MemoryCacheProvider::new(1_000_000, None)),
        )
    }

    #[tokio::test]
    async fn test_set_writes_both_tiers() {
        let (front, back) = tiers();
        let cache = TieredCache::new(Arc::clone(&front), Arc::clone(&back));

        cache.set("k", vec![1, 2, 3]).await.unwrap();

        assert_eq!(front.get("k").await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(back.get("k").await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_back_hit_is_promoted() {
        let (front, back) = tiers();
        back.set("k", vec![9]).await.unwrap();
        let cache = TieredCache::new(Arc::clone(&front), back);

        assert_eq!(cache.get("k").await.unwrap(), Some(vec![9]));
        assert_eq!(front.get("k").await.unwrap(), Some(vec![9]));
    }

    #[tokio::test]
    async fn test_miss_everywhere() {
        let (front, back) = tiers();
        let cache = TieredCache::new(front, back);

        assert_eq!(cache.get("missing").await.unwrap(), None);
        assert!(!cache.contains("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_from_both() {
        let (front, back) = tiers();
        let cache = TieredCache::new(Arc::clone(&front), Arc::clone(&back));
        cache.set("k", vec![1]).await.unwrap();

        assert!(cache.delete("k").await.unwrap());
        assert!(!front.contains("k").await.unwrap());
        assert!(!back.contains("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
    }

    #[test]
    fn test_max_size_is_summed() {
        let (front, back) = tiers();
        let cache = TieredCache::new(front, back);
        assert_eq!(cache.max_size_bytes(), 2_000_000);
    }
}
