//! JPEG mosaic encoder.

use image::codecs::jpeg;
use image::ExtendedColorType;

use crate::mosaic::Mosaic;

use super::encoder::MosaicEncoder;
use super::error::EncodeError;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Largest dimension a baseline JPEG can represent.
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Baseline JPEG encoder.
///
/// ```
/// use coverwall::encode::{JpegEncoder, MosaicEncoder};
///
/// let encoder = JpegEncoder::new(85).unwrap();
/// assert_eq!(encoder.quality(), 85);
/// assert_eq!(encoder.content_type(), "image/jpeg");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    /// Create an encoder with the given quality (1–100).
    pub fn new(quality: u8) -> Result<Self, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::InvalidQuality(quality));
        }
        Ok(Self { quality })
    }

    /// Encoding quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl MosaicEncoder for JpegEncoder {
    fn encode(&self, mosaic: &Mosaic) -> Result<Vec<u8>, EncodeError> {
        let (width, height) = (mosaic.width(), mosaic.height());
        if width == 0 || height == 0 {
            return Err(EncodeError::InvalidDimensions {
                width,
                height,
                reason: "empty image".to_string(),
            });
        }
        if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
            return Err(EncodeError::InvalidDimensions {
                width,
                height,
                reason: format!("JPEG is limited to {} pixels per side", MAX_JPEG_DIMENSION),
            });
        }

        let mut bytes = Vec::new();
        let mut encoder = jpeg::JpegEncoder::new_with_quality(&mut bytes, self.quality);
        encoder
            .encode(mosaic.image().as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

        Ok(bytes)
    }

    fn content_type(&self) -> &'static str {
        "image/jpeg"
    }

    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn name(&self) -> String {
        format!("JPEG q{}", self.quality)
    }

    fn max_dimension(&self) -> u32 {
        MAX_JPEG_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mosaic::compose_mosaic;
    use crate::tile::Tile;
    use std::num::NonZeroUsize;

    fn mosaic(width: u32, height: u32) -> Mosaic {
        compose_mosaic(
            &[Tile::solid(width, height, [200, 100, 50])],
            NonZeroUsize::new(1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_quality_bounds() {
        assert!(JpegEncoder::new(1).is_ok());
        assert!(JpegEncoder::new(100).is_ok());
        assert_eq!(JpegEncoder::new(0), Err(EncodeError::InvalidQuality(0)));
        assert_eq!(JpegEncoder::new(101), Err(EncodeError::InvalidQuality(101)));
    }

    #[test]
    fn test_default_quality() {
        assert_eq!(JpegEncoder::default().quality(), 90);
        assert_eq!(JpegEncoder::default().name(), "JPEG q90");
        assert_eq!(JpegEncoder::default().max_dimension(), 65_535);
    }

    #[test]
    fn test_encode_produces_decodable_jpeg() {
        let bytes = JpegEncoder::default().encode(&mosaic(32, 16)).unwrap();

        // SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = JpegEncoder::default();
        let m = mosaic(20, 20);
        assert_eq!(encoder.encode(&m).unwrap(), encoder.encode(&m).unwrap());
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let noisy = Tile::from_image(image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 31 % 256) as u8, (y * 17 % 256) as u8, ((x ^ y) * 7 % 256) as u8])
        }));
        let m = compose_mosaic(&[noisy], NonZeroUsize::new(1).unwrap()).unwrap();

        let high = JpegEncoder::new(95).unwrap().encode(&m).unwrap();
        let low = JpegEncoder::new(10).unwrap().encode(&m).unwrap();
        assert!(low.len() < high.len());
    }
}
