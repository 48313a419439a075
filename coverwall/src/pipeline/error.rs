//! Error types for the mosaic pipeline.

use thiserror::Error;

use crate::encode::EncodeError;

/// Terminal outcome of a failed composition request.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The URL list was empty or every fetch failed.
    #[error("no tiles available from {requested} source URLs")]
    NoTilesAvailable { requested: usize },

    /// Tiles were fetched but could not be arranged (zero-sized image).
    #[error("cannot compose a mosaic from {tiles} tiles in {columns} columns")]
    InsufficientForMosaic { tiles: usize, columns: usize },

    /// The composed image could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// A blocking task panicked or was aborted.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MosaicError {
    /// Returns true for failures that indicate a defect rather than bad
    /// input.
    pub fn is_internal(&self) -> bool {
        matches!(self, MosaicError::Encoding(_) | MosaicError::Internal(_))
    }

    /// Returns true if no source image could be obtained.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MosaicError::NoTilesAvailable { .. })
    }
}
