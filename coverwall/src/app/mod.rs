//! Application bootstrap and lifecycle management.
//!
//! [`CoverwallApp`] starts the cache services first (the disk provider owns
//! its GC daemon), then builds the shared HTTP client and pipeline on top.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    CoverwallApp                      │
//! │                                                      │
//! │  1. CacheService (memory) ──┐                        │
//! │                             ├─► TieredCache          │
//! │  2. CacheService (disk) ────┘     └─► TileCacheClient│
//! │       └── GC daemon                                  │
//! │                                                      │
//! │  3. AsyncReqwestClient ─► TileFetcher ─► MosaicPipeline
//! └──────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{AppPipeline, CoverwallApp};
pub use config::{AppConfig, DiskCacheAppConfig, MemoryCacheAppConfig};
pub use error::AppError;
