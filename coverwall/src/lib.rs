//! Coverwall - compose many cover images into one cacheable mosaic.
//!
//! Given an ordered list of image URLs, coverwall fetches them concurrently,
//! tolerates individual failures, arranges the survivors into a grid and
//! encodes the result as a JPEG with a stable fingerprint and HTTP caching
//! metadata.
//!
//! # Modules
//!
//! - [`http`]: async HTTP client abstraction
//! - [`tile`]: decoded source images
//! - [`cache`]: optional fetch cache (memory and disk)
//! - [`fetch`]: bounded, order-preserving, failure-tolerant fetching
//! - [`mosaic`]: grid composition with center-crop and padding
//! - [`encode`]: JPEG encoding, fingerprints and cache headers
//! - [`pipeline`]: fetch → compose → encode for one request
//! - [`app`]: service bootstrap for front ends
//! - [`config`]: `~/.coverwall/config.ini`
//! - [`logging`]: tracing subscriber setup

pub mod app;
pub mod cache;
pub mod config;
pub mod encode;
pub mod fetch;
pub mod http;
pub mod logging;
pub mod mosaic;
pub mod pipeline;
pub mod tile;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
