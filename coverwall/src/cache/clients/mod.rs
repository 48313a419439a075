//! Domain-specific cache clients.
//!
//! These clients wrap the generic `Cache` trait with domain-specific key and
//! value translation.
//!
//! ```text
//! ┌─────────────────────┐
//! │  TileCacheClient    │
//! │                     │
//! │  URL  → "tile:{url}"│
//! │  Tile → bincode     │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────────────────────────────────┐
//! │              Arc<dyn Cache>                     │
//! │  Generic key-value store (string → Vec<u8>)     │
//! └─────────────────────────────────────────────────┘
//! ```

mod tile;

pub use tile::TileCacheClient;
