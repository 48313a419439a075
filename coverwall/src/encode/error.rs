//! Error types for mosaic encoding.

use thiserror::Error;

/// Errors that can occur while encoding a mosaic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Image dimensions are not encodable in the target format.
    #[error("Invalid dimensions {width}×{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Quality outside 1–100.
    #[error("Invalid quality {0}: must be between 1 and 100")]
    InvalidQuality(u8),

    /// The underlying codec failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The cache lifetime does not produce a representable expiry time.
    #[error("Cache lifetime of {0} seconds is out of range")]
    InvalidCacheLifetime(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = EncodeError::InvalidDimensions {
            width: 0,
            height: 69,
            reason: "empty image".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid dimensions 0×69: empty image");
    }

    #[test]
    fn test_invalid_quality_display() {
        assert_eq!(
            EncodeError::InvalidQuality(0).to_string(),
            "Invalid quality 0: must be between 1 and 100"
        );
    }
}
