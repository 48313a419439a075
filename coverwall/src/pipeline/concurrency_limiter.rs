//! Concurrency limiter for outbound tile fetches.
//!
//! One limiter is created per composition request and dropped when the
//! request completes. It bounds how many fetches run at once, so a request
//! with hundreds of URLs does not open hundreds of connections.
//!
//! # Sizing
//!
//! ```text
//! permits = available_parallelism * DEFAULT_SCALING_FACTOR
//! ```
//!
//! Falls back to [`DEFAULT_SCALING_FACTOR`] permits when the CPU count is
//! unknown.
//!
//! # Usage
//!
//! ```ignore
//! let limiter = ConcurrencyLimiter::with_defaults("fetch");
//!
//! if let Some(permit) = limiter.acquire().await {
//!     tokio::spawn(async move {
//!         let _permit = permit; // released when dropped
//!         // fetch...
//!     });
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Permits per available CPU.
pub const DEFAULT_SCALING_FACTOR: usize = 4;

/// Semaphore-based limiter with in-flight and peak tracking.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_permits: usize,
    counters: Arc<Counters>,
    label: String,
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Counters {
    fn enter(&self) {
        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);
    }
}

impl ConcurrencyLimiter {
    /// Creates a limiter allowing `max_concurrent` operations at once.
    ///
    /// A value of 0 is raised to 1.
    pub fn new(max_concurrent: usize, label: impl Into<String>) -> Self {
        let max_permits = max_concurrent.max(1);
        let label = label.into();

        debug!(
            label = %label,
            max_concurrent = max_permits,
            "Concurrency limiter created"
        );

        Self {
            semaphore: Arc::new(Semaphore::new(max_permits)),
            max_permits,
            counters: Arc::new(Counters::default()),
            label,
        }
    }

    /// Creates a limiter sized at `available_parallelism * 4`.
    pub fn with_defaults(label: impl Into<String>) -> Self {
        Self::new(default_max_concurrent(), label)
    }

    /// Creates a limiter from a configured worker count, where 0 selects
    /// the default size.
    pub fn from_workers(workers: usize, label: impl Into<String>) -> Self {
        if workers == 0 {
            Self::with_defaults(label)
        } else {
            Self::new(workers, label)
        }
    }

    /// Waits for a permit.
    ///
    /// The returned permit is owned and can be moved into a spawned task.
    /// Returns `None` only if the semaphore was closed, which this type
    /// never does.
    pub async fn acquire(&self) -> Option<ConcurrencyPermit> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok()?;
        Some(self.track(permit))
    }

    /// Tries to acquire a permit without waiting.
    pub fn try_acquire(&self) -> Option<ConcurrencyPermit> {
        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;
        Some(self.track(permit))
    }

    fn track(&self, permit: OwnedSemaphorePermit) -> ConcurrencyPermit {
        self.counters.enter();
        ConcurrencyPermit {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        }
    }

    /// Label used in log output.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Maximum number of concurrent operations allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Current number of held permits.
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of simultaneously held permits.
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Number of permits currently available.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Default limiter size: `available_parallelism * 4`.
pub fn default_max_concurrent() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
        * DEFAULT_SCALING_FACTOR
}

/// A held slot in a [`ConcurrencyLimiter`]. Released on drop.
#[derive(Debug)]
pub struct ConcurrencyPermit {
    _permit: OwnedSemaphorePermit,
    counters: Arc<Counters>,
}

impl Drop for ConcurrencyPermit {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
