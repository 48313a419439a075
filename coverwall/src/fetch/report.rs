//! Outcome counters for one batch fetch.

use std::fmt;

/// Why a batch fetch stopped before every URL was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchInterruption {
    /// The caller's cancellation token fired.
    Cancelled,
    /// The overall deadline elapsed.
    DeadlineExpired,
}

/// Per-outcome counts for a batch fetch.
///
/// Every requested URL lands in exactly one bucket, so
/// `cache_hits + fetched + not_found + failed + abandoned == requested`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Number of URLs in the request, duplicates included.
    pub requested: usize,
    /// Tiles served from the fetch cache.
    pub cache_hits: usize,
    /// Tiles downloaded and decoded.
    pub fetched: usize,
    /// URLs the origin reported as missing.
    pub not_found: usize,
    /// URLs that failed for any other reason.
    pub failed: usize,
    /// URLs still outstanding when the batch was interrupted.
    pub abandoned: usize,
    /// Set if the batch stopped early.
    pub interruption: Option<FetchInterruption>,
}

impl FetchReport {
    /// Empty report for a batch of `requested` URLs.
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    /// Number of tiles that were obtained.
    pub fn tiles(&self) -> usize {
        self.cache_hits + self.fetched
    }

    /// Returns true if every URL produced a tile.
    pub fn is_complete(&self) -> bool {
        self.tiles() == self.requested
    }

    /// Returns true if the caller cancelled the batch.
    pub fn was_cancelled(&self) -> bool {
        self.interruption == Some(FetchInterruption::Cancelled)
    }
}

impl fmt::Display for FetchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} tiles ({} cached, {} fetched, {} not found, {} failed, {} abandoned)",
            self.tiles(),
            self.requested,
            self.cache_hits,
            self.fetched,
            self.not_found,
            self.failed,
            self.abandoned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty() {
        let report = FetchReport::new(5);
        assert_eq!(report.requested, 5);
        assert_eq!(report.tiles(), 0);
        assert!(!report.is_complete());
        assert!(report.interruption.is_none());
    }

    #[test]
    fn test_empty_batch_is_complete() {
        assert!(FetchReport::new(0).is_complete());
    }

    #[test]
    fn test_display() {
        let report = FetchReport {
            requested: 10,
            cache_hits: 2,
            fetched: 5,
            not_found: 1,
            failed: 1,
            abandoned: 1,
            interruption: Some(FetchInterruption::DeadlineExpired),
        };
        assert_eq!(
            report.to_string(),
            "7/10 tiles (2 cached, 5 fetched, 1 not found, 1 failed, 1 abandoned)"
        );
        assert!(!report.was_cancelled());
    }
}
