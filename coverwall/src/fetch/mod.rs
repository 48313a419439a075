//! Tile fetching with bounded concurrency and partial-failure tolerance.
//!
//! [`TileFetcher`] turns an ordered list of source URLs into decoded
//! [`Tile`](crate::tile::Tile)s. Individual URLs may fail (404, timeout,
//! undecodable bytes); they are skipped and counted in a [`FetchReport`],
//! never propagated.
//!
//! # Phases
//!
//! 1. **Cache lookup (unbounded):** every URL is looked up in the fetch cache
//!    concurrently. Hits never touch the network.
//! 2. **Download (bounded):** misses are spawned one at a time as limiter
//!    permits become available, so the number of live fetch tasks never
//!    exceeds the limiter size.
//!
//! Results carry their input index and are reassembled in input order.

mod fetcher;
mod report;

pub use fetcher::TileFetcher;
pub use report::{FetchInterruption, FetchReport};
