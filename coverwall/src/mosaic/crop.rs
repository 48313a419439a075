//! Center-crop geometry.
//!
//! Both composition passes (tiles within a row, rows within the mosaic) use
//! the same rule: the crop window starts at `(dim - target) / 2`, so an odd
//! remainder always removes the extra pixel from the trailing edge.

use image::{imageops, RgbImage};

/// Offset of a centered window of `target` pixels inside `dim` pixels.
///
/// Returns 0 when `target >= dim`.
pub fn center_offset(dim: u32, target: u32) -> u32 {
    dim.saturating_sub(target) / 2
}

/// Crop `image` to `width × height`, centered.
///
/// Dimensions larger than the source are clamped to the source size.
pub fn center_crop(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let width = width.min(image.width());
    let height = height.min(image.height());
    if width == image.width() && height == image.height() {
        return image.clone();
    }

    let x = center_offset(image.width(), width);
    let y = center_offset(image.height(), height);
    imageops::crop_imm(image, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    /// Image whose pixel (x, y) encodes its own coordinates.
    fn coordinate_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_even_remainder_is_split() {
        assert_eq!(center_offset(10, 6), 2);
    }

    #[test]
    fn test_odd_remainder_goes_to_trailing_edge() {
        // 7 - 4 = 3: one pixel leading, two trailing
        assert_eq!(center_offset(7, 4), 1);
    }

    #[test]
    fn test_no_crop_needed() {
        assert_eq!(center_offset(5, 5), 0);
        assert_eq!(center_offset(5, 9), 0);
    }

    #[test]
    fn test_center_crop_picks_middle_window() {
        let image = coordinate_image(7, 5);
        let cropped = center_crop(&image, 4, 2);

        assert_eq!(cropped.dimensions(), (4, 2));
        // x offset 1, y offset 1
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([1, 1, 0]));
        assert_eq!(cropped.get_pixel(3, 1), &Rgb([4, 2, 0]));
    }

    #[test]
    fn test_center_crop_identity() {
        let image = coordinate_image(3, 3);
        assert_eq!(center_crop(&image, 3, 3), image);
    }

    proptest! {
        #[test]
        fn prop_crop_has_requested_size(
            w in 1u32..64, h in 1u32..64, tw in 1u32..64, th in 1u32..64
        ) {
            let image = coordinate_image(w, h);
            let cropped = center_crop(&image, tw, th);
            prop_assert_eq!(cropped.dimensions(), (tw.min(w), th.min(h)));
        }

        #[test]
        fn prop_trailing_margin_never_smaller(dim in 0u32..10_000, target in 0u32..10_000) {
            prop_assume!(target <= dim);
            let leading = center_offset(dim, target);
            let trailing = dim - target - leading;
            prop_assert!(trailing == leading || trailing == leading + 1);
        }
    }
}
