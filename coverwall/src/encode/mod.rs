//! Mosaic encoding and HTTP cache metadata.
//!
//! The [`MosaicEncoder`] trait decouples the pipeline from any particular
//! codec; [`JpegEncoder`] is the production implementation.
//!
//! ```text
//! ┌─────────────────────┐
//! │   MosaicPipeline    │
//! │                     │
//! │ Arc<dyn MosaicEncoder>
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   MosaicEncoder     │ (trait)
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    JpegEncoder      │
//! └─────────────────────┘
//! ```
//!
//! [`encode_mosaic`] wraps the encoder output in an [`EncodedImage`]
//! carrying a [`Fingerprint`] (ETag), `Cache-Control` and `Expires` values,
//! and a sharded storage key.

mod encoded;
mod encoder;
mod error;
mod fingerprint;
mod jpeg;

pub use encoded::{encode_mosaic, encode_mosaic_at, EncodedImage, DEFAULT_CACHE_LIFETIME};
pub use encoder::MosaicEncoder;
pub use error::EncodeError;
pub use fingerprint::{Fingerprint, FingerprintStrategy};
pub use jpeg::{JpegEncoder, DEFAULT_JPEG_QUALITY};
