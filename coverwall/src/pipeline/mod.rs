//! Composition pipeline: fetch → compose → encode.
//!
//! [`MosaicPipeline`] owns the shared fetcher and composer and turns a list
//! of source URLs into an [`EncodedImage`](crate::encode::EncodedImage).
//! Every request gets its own [`ConcurrencyLimiter`] so one request cannot
//! starve another of fetch slots.

mod concurrency_limiter;
mod config;
mod error;
mod runner;

pub use concurrency_limiter::{
    default_max_concurrent, ConcurrencyLimiter, ConcurrencyPermit, DEFAULT_SCALING_FACTOR,
};
pub use config::{PipelineConfig, DEFAULT_COLUMNS, DEFAULT_DEADLINE};
pub use error::MosaicError;
pub use runner::{MosaicPipeline, PipelineOutput};
