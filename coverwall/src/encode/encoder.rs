//! Mosaic encoder trait.

use crate::mosaic::Mosaic;

use super::error::EncodeError;

/// Serializes a composed mosaic to bytes.
///
/// Implementations must be `Send + Sync` so a single encoder can be shared
/// by the pipeline across requests and moved into blocking tasks.
pub trait MosaicEncoder: Send + Sync {
    /// Encode the mosaic.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are unsupported or the codec fails.
    fn encode(&self, mosaic: &Mosaic) -> Result<Vec<u8>, EncodeError>;

    /// MIME type of the output, e.g. `image/jpeg`.
    fn content_type(&self) -> &'static str;

    /// File extension of the output, without the dot.
    fn extension(&self) -> &'static str;

    /// Human-readable encoder name for logs.
    fn name(&self) -> String;

    /// Largest width or height the output format can represent.
    fn max_dimension(&self) -> u32 {
        u32::MAX
    }
}
