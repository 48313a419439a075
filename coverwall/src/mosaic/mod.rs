//! Mosaic composition.
//!
//! Arranges an ordered list of tiles into a grid. Tiles of uneven size are
//! normalized by center-cropping (or, under the canonical policy, resizing),
//! a short final row is padded with black tiles, and rows of uneven width
//! are center-cropped to the narrowest before stacking.
//!
//! ```text
//! tiles:  [t0 t1 t2 t3 t4]   columns = 3
//!
//! ┌────┬────┬────┐
//! │ t0 │ t1 │ t2 │   row height = min(h0, h1, h2)
//! ├────┼────┼────┤
//! │ t3 │ t4 │ ██ │   ██ = black padding
//! └────┴────┴────┘
//! ```

mod composer;
mod crop;
mod policy;

pub use composer::{compose_mosaic, Mosaic, MosaicComposer};
pub use crop::{center_crop, center_offset};
pub use policy::{CompositionPolicy, DEFAULT_CANONICAL_HEIGHT, DEFAULT_CANONICAL_WIDTH};
