//! Decoded tile images.
//!
//! A [`Tile`] is one source image normalized to 8-bit RGB, ready for
//! composition. Tiles are produced by the fetcher, never mutated afterwards,
//! and consumed by the mosaic composer.

mod error;
mod types;

pub use error::TileUnavailable;
pub use types::{SourceUrl, Tile, CHANNELS};
