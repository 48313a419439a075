//! On-disk cache provider with internal garbage collection.
//!
//! Entries are stored as one file per key and survive process restarts. A
//! background GC daemon, owned by the provider, periodically evicts the
//! least recently used files once the directory exceeds its size limit.
//!
//! # Eviction Strategy
//!
//! LRU approximation based on file modification time:
//! - reads refresh the mtime of the entry they hit
//! - when over the limit, oldest files are deleted first
//! - eviction targets 90% of the limit, leaving headroom for new writes
//!
//! # File Layout
//!
//! ```text
//! {cache_dir}/{sha256(key)}.cache
//! ```
//!
//! Keys are hashed with SHA-256 so file names stay stable across builds and
//! safe on every platform, whatever characters the URL contains.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::config::DiskProviderConfig;
use crate::cache::traits::{BoxFuture, Cache, GcResult, ServiceCacheError};

/// Target percentage of limit after eviction (0.9 = 90%).
const EVICTION_TARGET_PERCENTAGE: f64 = 0.9;

/// Extension of committed cache entries.
const ENTRY_EXTENSION: &str = "cache";

/// Extension of in-progress writes.
const TEMP_EXTENSION: &str = "tmp";

/// On-disk cache provider with internal garbage collection.
///
/// Call [`shutdown`](Self::shutdown) to stop the GC daemon; dropping the
/// provider only signals it.
pub struct DiskCacheProvider {
    directory: PathBuf,
    max_size_bytes: u64,
    gc_interval: Duration,

    /// Approximate size, refreshed on every GC cycle and bumped on writes.
    cached_size: AtomicU64,

    /// Approximate entry count, refreshed on every GC cycle.
    cached_count: AtomicU64,

    /// Sequence for unique temp file names; concurrent writers of one key
    /// never share a temp file.
    write_seq: AtomicU64,

    gc_handle: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

/// Snapshot of the cache directory contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    /// Number of entry files.
    pub entries: u64,
    /// Total bytes across all entry files.
    pub bytes: u64,
}

impl DiskCacheProvider {
    /// Start a new disk cache provider with its GC daemon.
    ///
    /// Creates the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub async fn start(config: DiskProviderConfig) -> Result<Arc<Self>, ServiceCacheError> {
        tokio::fs::create_dir_all(&config.directory).await?;

        let provider = Arc::new(Self {
            directory: config.directory.clone(),
            max_size_bytes: config.max_size_bytes,
            gc_interval: config.gc_interval,
            cached_size: AtomicU64::new(0),
            cached_count: AtomicU64::new(0),
            write_seq: AtomicU64::new(0),
            gc_handle: Mutex::new(None),
            shutdown: CancellationToken::new(),
        });

        let gc_provider = Arc::clone(&provider);
        let gc_handle = tokio::spawn(async move {
            gc_provider.run_gc_daemon().await;
        });
        *provider.gc_handle.lock() = Some(gc_handle);

        info!(
            dir = %config.directory.display(),
            max_bytes = config.max_size_bytes,
            interval_secs = config.gc_interval.as_secs(),
            "Disk cache provider started with GC daemon"
        );

        Ok(provider)
    }

    /// Directory holding the cache entries.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scan the directory and refresh the cached size and entry count.
    pub async fn scan(&self) -> Result<DiskUsage, ServiceCacheError> {
        let directory = self.directory.clone();
        let usage = tokio::task::spawn_blocking(move || {
            let files = collect_cache_files(&directory);
            DiskUsage {
                entries: files.len() as u64,
                bytes: files.iter().map(|(_, _, size)| size).sum(),
            }
        })
        .await
        .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;

        self.cached_size.store(usage.bytes, Ordering::Relaxed);
        self.cached_count.store(usage.entries, Ordering::Relaxed);
        Ok(usage)
    }

    /// Delete every entry in the cache directory.
    ///
    /// Returns the number of entries and bytes removed.
    pub async fn clear(&self) -> Result<DiskUsage, ServiceCacheError> {
        let directory = self.directory.clone();
        let removed = tokio::task::spawn_blocking(move || {
            let mut removed = DiskUsage::default();
            for (path, _, size) in collect_cache_files(&directory) {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        removed.entries += 1;
                        removed.bytes += size;
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Failed to delete cache file");
                    }
                }
            }
            removed
        })
        .await
        .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;

        self.cached_size.store(0, Ordering::Relaxed);
        self.cached_count.store(0, Ordering::Relaxed);

        info!(
            entries = removed.entries,
            bytes = removed.bytes,
            "Disk cache cleared"
        );
        Ok(removed)
    }

    /// Stop the GC daemon, waiting for an in-progress cycle to finish.
    pub async fn shutdown(&self) {
        info!("Disk cache provider shutting down");
        self.shutdown.cancel();

        let handle = self.gc_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        info!("Disk cache provider shutdown complete");
    }

    async fn run_gc_daemon(&self) {
        if let Err(e) = self.run_gc_cycle().await {
            warn!(error = %e, "Initial GC cycle failed");
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("Disk cache GC daemon stopping");
                    break;
                }
                _ = tokio::time::sleep(self.gc_interval) => {
                    if let Err(e) = self.run_gc_cycle().await {
                        warn!(error = %e, "GC cycle failed");
                    }
                }
            }
        }
    }

    async fn run_gc_cycle(&self) -> Result<GcResult, ServiceCacheError> {
        let max_bytes = self.max_size_bytes;
        let directory = self.directory.clone();

        let cycle = tokio::task::spawn_blocking(move || gc_cycle_blocking(&directory, max_bytes))
            .await
            .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))?;

        self.cached_size.store(
            cycle.size_before.saturating_sub(cycle.bytes_freed),
            Ordering::Relaxed,
        );
        self.cached_count.store(
            cycle.count_before.saturating_sub(cycle.entries_removed as u64),
            Ordering::Relaxed,
        );

        if cycle.entries_removed > 0 {
            info!(
                entries_removed = cycle.entries_removed,
                bytes_freed = cycle.bytes_freed,
                duration_ms = cycle.duration_ms,
                "Disk cache GC complete"
            );
        }

        Ok(GcResult {
            entries_removed: cycle.entries_removed,
            bytes_freed: cycle.bytes_freed,
            duration_ms: cycle.duration_ms,
        })
    }

    /// Stable file name for a cache key.
    fn key_to_filename(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        format!("{:x}.{}", hasher.finalize(), ENTRY_EXTENSION)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.directory.join(Self::key_to_filename(key))
    }

    /// `{entry}.{pid}-{seq}.tmp`, unique per write.
    fn temp_path(&self, entry: &Path) -> PathBuf {
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        entry.with_extension(format!(
            "{}.{}-{}.{}",
            ENTRY_EXTENSION,
            std::process::id(),
            seq,
            TEMP_EXTENSION
        ))
    }
}

struct GcCycleResult {
    entries_removed: usize,
    bytes_freed: u64,
    size_before: u64,
    count_before: u64,
    duration_ms: u64,
}

fn gc_cycle_blocking(directory: &Path, max_bytes: u64) -> GcCycleResult {
    let start = Instant::now();

    let mut files = collect_cache_files(directory);
    let total_size: u64 = files.iter().map(|(_, _, size)| size).sum();
    let count_before = files.len() as u64;

    debug!(
        file_count = count_before,
        total_size = total_size,
        limit = max_bytes,
        "GC cycle scan complete"
    );

    if total_size <= max_bytes {
        return GcCycleResult {
            entries_removed: 0,
            bytes_freed: 0,
            size_before: total_size,
            count_before,
            duration_ms: start.elapsed().as_millis() as u64,
        };
    }

    let target_size = (max_bytes as f64 * EVICTION_TARGET_PERCENTAGE) as u64;

    info!(
        current_size = total_size,
        limit = max_bytes,
        target = target_size,
        "Disk cache over limit, starting eviction"
    );

    // Oldest first
    files.sort_by_key(|(_, mtime, _)| *mtime);

    let mut bytes_freed = 0u64;
    let mut entries_removed = 0usize;
    let mut remaining = total_size;

    for (path, _, size) in files {
        if remaining <= target_size {
            break;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                bytes_freed += size;
                remaining = remaining.saturating_sub(size);
                entries_removed += 1;
            }
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "Failed to delete cache file during eviction"
                );
            }
        }
    }

    GcCycleResult {
        entries_removed,
        bytes_freed,
        size_before: total_size,
        count_before,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Committed entry files with their mtime and size.
fn collect_cache_files(dir: &Path) -> Vec<(PathBuf, SystemTime, u64)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Failed to read cache directory");
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == ENTRY_EXTENSION)
        })
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some((entry.path(), mtime, metadata.len()))
        })
        .collect()
}

/// Read an entry and mark it as recently used.
fn read_and_touch(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(data) => {
            if let Ok(file) = std::fs::File::options().append(true).open(path) {
                let _ = file.set_modified(SystemTime::now());
            }
            Ok(Some(data))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            if self.shutdown.is_cancelled() {
                return Err(ServiceCacheError::ShuttingDown);
            }

            // Temp file + rename so readers never see a partial entry
            let temp_path = self.temp_path(&path);
            if let Err(e) = tokio::fs::write(&temp_path, &value).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e.into());
            }

            let replaced = tokio::fs::metadata(&path)
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e.into());
            }

            let written = value.len() as u64;
            let _ = self
                .cached_size
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |size| {
                    Some(size.saturating_sub(replaced).saturating_add(written))
                });
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            let data = tokio::task::spawn_blocking(move || read_and_touch(&path))
                .await
                .map_err(|e| ServiceCacheError::SpawnError(e.to_string()))??;
            Ok(data)
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(ServiceCacheError::Io(e)),
            }
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, ServiceCacheError>> {
        let path = self.key_path(key);
        Box::pin(async move { Ok(tokio::fs::try_exists(&path).await?) })
    }

    fn size_bytes(&self) -> u64 {
        self.cached_size.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.cached_count.load(Ordering::Relaxed)
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    fn gc(&self) -> BoxFuture<'_, Result<GcResult, ServiceCacheError>> {
        Box::pin(async move { self.run_gc_cycle().await })
    }
}

impl Drop for DiskCacheProvider {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
