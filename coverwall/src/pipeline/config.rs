//! Pipeline configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::encode::{FingerprintStrategy, DEFAULT_CACHE_LIFETIME};
use crate::mosaic::CompositionPolicy;

/// Default tiles per row.
pub const DEFAULT_COLUMNS: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Default overall deadline per composition request.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(120);

/// Settings for one [`MosaicPipeline`](super::MosaicPipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Tiles per row.
    pub columns: NonZeroUsize,

    /// How uneven tiles are normalized.
    pub policy: CompositionPolicy,

    /// Concurrent fetches per request; 0 selects `4 × CPUs`.
    pub max_concurrent: usize,

    /// Overall fetch deadline per request. `None` waits for every fetch.
    pub deadline: Option<Duration>,

    /// What the fingerprint is computed from.
    pub fingerprint: FingerprintStrategy,

    /// Client cache lifetime advertised in the headers.
    pub cache_lifetime: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            policy: CompositionPolicy::default(),
            max_concurrent: 0,
            deadline: Some(DEFAULT_DEADLINE),
            fingerprint: FingerprintStrategy::default(),
            cache_lifetime: DEFAULT_CACHE_LIFETIME,
        }
    }
}

impl PipelineConfig {
    /// Set tiles per row.
    pub fn with_columns(mut self, columns: NonZeroUsize) -> Self {
        self.columns = columns;
        self
    }

    /// Set the composition policy.
    pub fn with_policy(mut self, policy: CompositionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fetch concurrency (0 = default).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Set or clear the overall deadline.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the fingerprint strategy.
    pub fn with_fingerprint(mut self, fingerprint: FingerprintStrategy) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Set the advertised cache lifetime.
    pub fn with_cache_lifetime(mut self, cache_lifetime: Duration) -> Self {
        self.cache_lifetime = cache_lifetime;
        self
    }
}
