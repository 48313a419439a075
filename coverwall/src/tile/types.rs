//! Tile and source URL types.

use image::{Rgb, RgbImage};

use super::error::TileUnavailable;

/// Opaque identifier of a tile's origin.
///
/// Order is significant and duplicates are allowed; the pipeline never
/// reorders or deduplicates URLs.
pub type SourceUrl = String;

/// Number of channels in every tile (RGB).
pub const CHANNELS: usize = 3;

/// A decoded RGB tile.
///
/// Wraps an [`RgbImage`] so that every tile in the pipeline is guaranteed to
/// have exactly three 8-bit channels, regardless of the source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    image: RgbImage,
}

impl Tile {
    /// Wrap an already decoded RGB image.
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Decode encoded image bytes (JPEG, PNG, GIF, ...) into an RGB tile.
    ///
    /// Paletted, grayscale and alpha images are converted to RGB; alpha is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TileUnavailable::Decode`] if the bytes are not a supported
    /// image.
    pub fn decode(bytes: &[u8]) -> Result<Self, TileUnavailable> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| TileUnavailable::Decode(e.to_string()))?;
        Ok(Self {
            image: decoded.to_rgb8(),
        })
    }

    /// Rebuild a tile from raw row-major RGB pixels.
    ///
    /// Returns `None` if `pixels.len() != width * height * 3`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, pixels).map(Self::from_image)
    }

    /// Create a solid black padding tile.
    pub fn padding(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb([0, 0, 0])),
        }
    }

    /// Create a tile filled with a single color. Mostly useful in tests.
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(color)),
        }
    }

    /// Tile width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Tile height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the tile, returning the underlying image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Raw row-major RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_rgb() {
        let source = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
        let bytes = encode(DynamicImage::ImageRgb8(source), ImageFormat::Png);

        let tile = Tile::decode(&bytes).unwrap();
        assert_eq!(tile.width(), 4);
        assert_eq!(tile.height(), 2);
        assert_eq!(tile.image().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_decode_grayscale_becomes_rgb() {
        let source = GrayImage::from_pixel(3, 3, Luma([200]));
        let bytes = encode(DynamicImage::ImageLuma8(source), ImageFormat::Png);

        let tile = Tile::decode(&bytes).unwrap();
        assert_eq!(tile.as_raw().len(), 3 * 3 * CHANNELS);
        assert_eq!(tile.image().get_pixel(1, 1), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_decode_alpha_is_dropped() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(source), ImageFormat::Png);

        let tile = Tile::decode(&bytes).unwrap();
        assert_eq!(tile.as_raw().len(), 2 * 2 * CHANNELS);
        assert_eq!(tile.image().get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = Tile::decode(b"definitely not an image");
        assert!(matches!(result, Err(TileUnavailable::Decode(_))));
    }

    #[test]
    fn test_padding_is_black() {
        let tile = Tile::padding(5, 4);
        assert_eq!(tile.width(), 5);
        assert_eq!(tile.height(), 4);
        assert!(tile.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Tile::from_raw(2, 2, vec![0; 12]).is_some());
        assert!(Tile::from_raw(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        assert!(Tile::padding(0, 5).is_empty());
        assert!(!Tile::padding(1, 1).is_empty());
    }
}
