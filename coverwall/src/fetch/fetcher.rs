//! Bounded concurrent tile fetcher.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::TileCacheClient;
use crate::http::AsyncHttpClient;
use crate::pipeline::{ConcurrencyLimiter, ConcurrencyPermit};
use crate::tile::{SourceUrl, Tile, TileUnavailable};

use super::report::{FetchInterruption, FetchReport};

type FetchResult = (usize, Result<Tile, TileUnavailable>);

/// Fetches and decodes tiles for a list of source URLs.
///
/// Holds the shared HTTP client and the optional fetch cache. Each call to
/// [`fetch_tiles_with_report`](Self::fetch_tiles_with_report) creates its own
/// [`ConcurrencyLimiter`], which is dropped when the call returns.
pub struct TileFetcher<C> {
    client: Arc<C>,
    cache: Option<TileCacheClient>,
    /// Limiter size per batch; 0 selects the CPU-scaled default.
    max_concurrent: usize,
}

impl<C> Clone for TileFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            cache: self.cache.clone(),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<C: AsyncHttpClient + 'static> TileFetcher<C> {
    /// Create a fetcher without a cache, using the default limiter size.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            cache: None,
            max_concurrent: 0,
        }
    }

    /// Attach a fetch cache.
    pub fn with_cache(mut self, cache: TileCacheClient) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the per-batch concurrency limit (0 = default).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// The attached fetch cache, if any.
    pub fn cache(&self) -> Option<&TileCacheClient> {
        self.cache.as_ref()
    }

    /// Fetch a single tile, consulting the cache first.
    pub async fn fetch_tile(&self, url: &str) -> Result<Tile, TileUnavailable> {
        if let Some(cache) = &self.cache {
            if let Some(tile) = cache.get(url).await {
                debug!(url = %url, "Tile cache hit");
                return Ok(tile);
            }
        }
        download_tile(self.client.as_ref(), self.cache.as_ref(), url).await
    }

    /// Fetch all URLs and return the decoded tiles in input order.
    ///
    /// Failed URLs are omitted. With a `deadline`, URLs still outstanding
    /// when it elapses are abandoned and the tiles completed so far are
    /// returned.
    pub async fn fetch_tiles(&self, urls: &[SourceUrl], deadline: Option<Duration>) -> Vec<Tile> {
        let (tiles, _) = self
            .fetch_tiles_with_report(urls, deadline, &CancellationToken::new())
            .await;
        tiles
    }

    /// Fetch all URLs, returning the tiles in input order plus per-outcome
    /// counts.
    ///
    /// Cancelling `cancel` or reaching `deadline` aborts every outstanding
    /// fetch. Completed tiles are kept; the rest are counted as abandoned.
    pub async fn fetch_tiles_with_report(
        &self,
        urls: &[SourceUrl],
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> (Vec<Tile>, FetchReport) {
        let mut report = FetchReport::new(urls.len());
        if urls.is_empty() {
            return (Vec::new(), report);
        }

        let expiry = deadline.map(|d| Instant::now() + d);
        let mut slots: Vec<Option<Tile>> = vec![None; urls.len()];

        let pending = match self
            .cache_lookup_phase(urls, expiry, cancel, &mut slots, &mut report)
            .await
        {
            Ok(pending) => pending,
            Err(interruption) => {
                report.abandoned = urls.len() - report.cache_hits;
                report.interruption = Some(interruption);
                return (collect_in_order(slots), report);
            }
        };

        debug!(
            requested = urls.len(),
            cache_hits = report.cache_hits,
            to_download = pending.len(),
            "Cache check complete, starting bounded downloads"
        );

        self.download_phase(urls, pending, expiry, cancel, &mut slots, &mut report)
            .await;

        info!(
            requested = report.requested,
            tiles = report.tiles(),
            cache_hits = report.cache_hits,
            not_found = report.not_found,
            failed = report.failed,
            abandoned = report.abandoned,
            "Tile fetch complete"
        );

        (collect_in_order(slots), report)
    }

    /// Phase 1: look every URL up in the cache concurrently.
    ///
    /// Returns the indices that still need downloading.
    async fn cache_lookup_phase(
        &self,
        urls: &[SourceUrl],
        expiry: Option<Instant>,
        cancel: &CancellationToken,
        slots: &mut [Option<Tile>],
        report: &mut FetchReport,
    ) -> Result<VecDeque<usize>, FetchInterruption> {
        let Some(cache) = &self.cache else {
            return Ok((0..urls.len()).collect());
        };

        let lookups = futures::future::join_all(urls.iter().map(|url| cache.get(url)));

        let cached = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchInterruption::Cancelled),
            _ = wait_until(expiry) => return Err(FetchInterruption::DeadlineExpired),
            cached = lookups => cached,
        };

        let mut pending = VecDeque::new();
        for (index, hit) in cached.into_iter().enumerate() {
            match hit {
                Some(tile) => {
                    slots[index] = Some(tile);
                    report.cache_hits += 1;
                }
                None => pending.push_back(index),
            }
        }
        Ok(pending)
    }

    /// Phase 2: download cache misses with permit-bounded spawning.
    async fn download_phase(
        &self,
        urls: &[SourceUrl],
        mut pending: VecDeque<usize>,
        expiry: Option<Instant>,
        cancel: &CancellationToken,
        slots: &mut [Option<Tile>],
        report: &mut FetchReport,
    ) {
        let limiter = ConcurrencyLimiter::from_workers(self.max_concurrent, "fetch");
        let mut downloads: JoinSet<FetchResult> = JoinSet::new();

        while !pending.is_empty() || !downloads.is_empty() {
            // Spawn only while permits are free
            while let Some(&index) = pending.front() {
                let Some(permit) = limiter.try_acquire() else {
                    break;
                };
                pending.pop_front();
                self.spawn_download(&mut downloads, index, urls[index].clone(), permit);
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    drain_finished(urls, &mut downloads, slots, report);
                    self.abandon(&mut downloads, &pending, FetchInterruption::Cancelled, report);
                    break;
                }

                _ = wait_until(expiry) => {
                    drain_finished(urls, &mut downloads, slots, report);
                    self.abandon(&mut downloads, &pending, FetchInterruption::DeadlineExpired, report);
                    break;
                }

                Some(joined) = downloads.join_next() => record_joined(urls, joined, slots, report),
            }
        }

        debug!(
            label = limiter.label(),
            max_concurrent = limiter.max_concurrent(),
            peak_in_flight = limiter.peak_in_flight(),
            "Download phase finished"
        );
    }

    fn spawn_download(
        &self,
        downloads: &mut JoinSet<FetchResult>,
        index: usize,
        url: SourceUrl,
        permit: ConcurrencyPermit,
    ) {
        let client = Arc::clone(&self.client);
        let cache = self.cache.clone();

        downloads.spawn(async move {
            let result = download_tile(client.as_ref(), cache.as_ref(), &url).await;
            // Free the slot before the result is observable
            drop(permit);
            (index, result)
        });
    }

    fn abandon(
        &self,
        downloads: &mut JoinSet<FetchResult>,
        pending: &VecDeque<usize>,
        interruption: FetchInterruption,
        report: &mut FetchReport,
    ) {
        report.abandoned = pending.len() + downloads.len();
        report.interruption = Some(interruption);
        downloads.abort_all();

        info!(
            reason = ?interruption,
            abandoned = report.abandoned,
            completed = report.tiles(),
            "Tile fetch interrupted"
        );
    }
}

/// Download, decode and cache one URL.
async fn download_tile<C: AsyncHttpClient>(
    client: &C,
    cache: Option<&TileCacheClient>,
    url: &str,
) -> Result<Tile, TileUnavailable> {
    let bytes = client.get(url).await?;

    let tile = tokio::task::spawn_blocking(move || Tile::decode(&bytes))
        .await
        .map_err(|e| TileUnavailable::Decode(e.to_string()))??;

    if let Some(cache) = cache {
        cache.set(url, &tile).await;
    }

    Ok(tile)
}

fn record_joined(
    urls: &[SourceUrl],
    joined: Result<FetchResult, JoinError>,
    slots: &mut [Option<Tile>],
    report: &mut FetchReport,
) {
    match joined {
        Ok((index, result)) => record_result(&urls[index], index, result, slots, report),
        Err(join_err) => {
            warn!(error = %join_err, "Tile fetch task failed");
            report.failed += 1;
        }
    }
}

/// Record downloads that completed but were not yet joined when the batch
/// was interrupted.
fn drain_finished(
    urls: &[SourceUrl],
    downloads: &mut JoinSet<FetchResult>,
    slots: &mut [Option<Tile>],
    report: &mut FetchReport,
) {
    while let Some(joined) = downloads.try_join_next() {
        record_joined(urls, joined, slots, report);
    }
}

fn record_result(
    url: &str,
    index: usize,
    result: Result<Tile, TileUnavailable>,
    slots: &mut [Option<Tile>],
    report: &mut FetchReport,
) {
    match result {
        Ok(tile) => {
            slots[index] = Some(tile);
            report.fetched += 1;
        }
        Err(TileUnavailable::NotFound) => {
            debug!(url = %url, "Tile not found, skipping");
            report.not_found += 1;
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Tile unavailable, skipping");
            report.failed += 1;
        }
    }
}

fn collect_in_order(slots: Vec<Option<Tile>>) -> Vec<Tile> {
    slots.into_iter().flatten().collect()
}

/// Resolves at `expiry`, or never if there is none.
async fn wait_until(expiry: Option<Instant>) {
    match expiry {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
