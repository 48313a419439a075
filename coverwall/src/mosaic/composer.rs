//! Grid composition of decoded tiles.

use std::iter;
use std::num::NonZeroUsize;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::tile::Tile;

use super::crop::center_crop;
use super::policy::CompositionPolicy;

/// A composed mosaic, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mosaic {
    image: RgbImage,
    rows: usize,
    columns: NonZeroUsize,
    tiles: usize,
}

impl Mosaic {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tiles per row.
    pub fn columns(&self) -> NonZeroUsize {
        self.columns
    }

    /// Number of source tiles placed (padding excluded).
    pub fn tile_count(&self) -> usize {
        self.tiles
    }

    /// Number of black padding tiles in the final row.
    pub fn padding_count(&self) -> usize {
        self.rows * self.columns.get() - self.tiles
    }

    /// Borrow the composed image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the mosaic, returning the composed image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Compose tiles into a grid of `columns` tiles per row.
///
/// 1. Tiles are grouped into consecutive rows of `columns`.
/// 2. Each tile is center-cropped to the smallest width and height in its row.
/// 3. A short final row is filled with black tiles of that size.
/// 4. Rows are center-cropped to the narrowest row and stacked.
///
/// Returns `None` for an empty input or if any tile has a zero dimension.
pub fn compose_mosaic(tiles: &[Tile], columns: NonZeroUsize) -> Option<Mosaic> {
    if tiles.is_empty() {
        return None;
    }

    let rows = tiles
        .chunks(columns.get())
        .map(|group| compose_row(group, columns))
        .collect::<Option<Vec<_>>>()?;

    let width = rows.iter().map(|row| row.width()).min()?;
    let height = rows.iter().map(|row| row.height()).sum::<u32>();
    if width == 0 || height == 0 {
        return None;
    }

    let mut image = RgbImage::new(width, height);
    let mut y = 0i64;
    for row in &rows {
        let cropped = center_crop(row, width, row.height());
        imageops::replace(&mut image, &cropped, 0, y);
        y += i64::from(row.height());
    }

    debug!(
        tiles = tiles.len(),
        rows = rows.len(),
        columns = columns.get(),
        width = width,
        height = height,
        "Mosaic composed"
    );

    Some(Mosaic {
        image,
        rows: rows.len(),
        columns,
        tiles: tiles.len(),
    })
}

/// Crop a group of tiles to a common size and concatenate them, padding to
/// `columns` slots.
fn compose_row(group: &[Tile], columns: NonZeroUsize) -> Option<RgbImage> {
    let tile_width = group.iter().map(Tile::width).min()?;
    let tile_height = group.iter().map(Tile::height).min()?;
    if tile_width == 0 || tile_height == 0 {
        return None;
    }

    let row_width = u32::try_from(columns.get())
        .ok()?
        .checked_mul(tile_width)?;

    let cropped = group
        .iter()
        .map(|tile| center_crop(tile.image(), tile_width, tile_height));
    let padding = iter::repeat_with(|| Tile::padding(tile_width, tile_height).into_image())
        .take(columns.get() - group.len());

    let mut row = RgbImage::new(row_width, tile_height);
    for (slot, tile) in cropped.chain(padding).enumerate() {
        let x = slot as i64 * i64::from(tile_width);
        imageops::replace(&mut row, &tile, x, 0);
    }
    Some(row)
}

/// Composes tiles under a fixed [`CompositionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicComposer {
    policy: CompositionPolicy,
    columns: NonZeroUsize,
}

impl MosaicComposer {
    /// Create a composer.
    pub fn new(policy: CompositionPolicy, columns: NonZeroUsize) -> Self {
        Self { policy, columns }
    }

    /// The active policy.
    pub fn policy(&self) -> CompositionPolicy {
        self.policy
    }

    /// Tiles per row.
    pub fn columns(&self) -> NonZeroUsize {
        self.columns
    }

    /// Compose `tiles` according to the policy.
    ///
    /// Returns `None` under the same conditions as [`compose_mosaic`].
    pub fn compose(&self, tiles: &[Tile]) -> Option<Mosaic> {
        match self.policy {
            CompositionPolicy::CenterCrop => compose_mosaic(tiles, self.columns),
            CompositionPolicy::Canonical { width, height } => {
                if width == 0 || height == 0 || tiles.iter().any(Tile::is_empty) {
                    return None;
                }
                let resized: Vec<Tile> = tiles
                    .iter()
                    .map(|tile| resize_tile(tile, width, height))
                    .collect();
                compose_mosaic(&resized, self.columns)
            }
        }
    }
}

fn resize_tile(tile: &Tile, width: u32, height: u32) -> Tile {
    if tile.width() == width && tile.height() == height {
        return tile.clone();
    }
    Tile::from_image(imageops::resize(
        tile.image(),
        width,
        height,
        FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn columns(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn uniform(count: usize, width: u32, height: u32) -> Vec<Tile> {
        (0..count)
            .map(|_| Tile::solid(width, height, WHITE))
            .collect()
    }

    // =========================================================================
    // Edge cases
    // =========================================================================

    #[test]
    fn test_empty_input_is_none() {
        assert!(compose_mosaic(&[], columns(10)).is_none());
    }

    #[test]
    fn test_zero_dimension_tile_is_none() {
        let tiles = vec![Tile::solid(4, 4, WHITE), Tile::padding(0, 4)];
        assert!(compose_mosaic(&tiles, columns(2)).is_none());
    }

    #[test]
    fn test_single_tile_ten_columns() {
        let mosaic = compose_mosaic(&uniform(1, 184, 69), columns(10)).unwrap();

        assert_eq!(mosaic.rows(), 1);
        assert_eq!(mosaic.padding_count(), 9);
        assert_eq!((mosaic.width(), mosaic.height()), (1840, 69));
        assert_eq!(mosaic.image().get_pixel(0, 0), &Rgb(WHITE));
        assert_eq!(mosaic.image().get_pixel(184, 0), &BLACK);
        assert_eq!(mosaic.image().get_pixel(1839, 68), &BLACK);
    }

    #[test]
    fn test_twenty_three_tiles_ten_columns() {
        let mosaic = compose_mosaic(&uniform(23, 20, 10), columns(10)).unwrap();

        assert_eq!(mosaic.rows(), 3);
        assert_eq!(mosaic.padding_count(), 7);
        assert_eq!((mosaic.width(), mosaic.height()), (200, 30));

        // Row 3: three real tiles, then seven black
        let y = 25;
        assert_eq!(mosaic.image().get_pixel(59, y), &Rgb(WHITE));
        assert_eq!(mosaic.image().get_pixel(60, y), &BLACK);
        assert_eq!(mosaic.image().get_pixel(199, y), &BLACK);
        // Rows 1 and 2 are full
        assert_eq!(mosaic.image().get_pixel(199, 5), &Rgb(WHITE));
        assert_eq!(mosaic.image().get_pixel(199, 15), &Rgb(WHITE));
    }

    #[test]
    fn test_exact_multiple_has_no_padding() {
        let mosaic = compose_mosaic(&uniform(6, 3, 3), columns(3)).unwrap();
        assert_eq!(mosaic.rows(), 2);
        assert_eq!(mosaic.padding_count(), 0);
    }

    // =========================================================================
    // Cropping
    // =========================================================================

    #[test]
    fn test_row_tiles_cropped_to_smallest() {
        // Row min is 4x2; the 6x5 tile loses 1 column left, 1 right,
        // 1 row top, 2 rows bottom
        let big = Tile::from_image(RgbImage::from_fn(6, 5, |x, y| Rgb([x as u8, y as u8, 9])));
        let small = Tile::solid(4, 2, WHITE);

        let mosaic = compose_mosaic(&[big, small], columns(2)).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (8, 2));
        assert_eq!(mosaic.image().get_pixel(0, 0), &Rgb([1, 1, 9]));
        assert_eq!(mosaic.image().get_pixel(3, 1), &Rgb([4, 2, 9]));
        assert_eq!(mosaic.image().get_pixel(4, 0), &Rgb(WHITE));
    }

    #[test]
    fn test_rows_cropped_to_narrowest() {
        // Row 1: 2 x 10px = 20 wide. Row 2: 2 x 7px = 14 wide.
        // Row 1 is cropped by 3px on each side.
        let tiles = vec![
            Tile::from_image(RgbImage::from_fn(10, 1, |x, _| Rgb([x as u8, 0, 0]))),
            Tile::from_image(RgbImage::from_fn(10, 1, |x, _| Rgb([x as u8 + 100, 0, 0]))),
            Tile::solid(7, 1, WHITE),
            Tile::solid(7, 1, WHITE),
        ];

        let mosaic = compose_mosaic(&tiles, columns(2)).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (14, 2));
        assert_eq!(mosaic.image().get_pixel(0, 0), &Rgb([3, 0, 0]));
        assert_eq!(mosaic.image().get_pixel(13, 0), &Rgb([106, 0, 0]));
    }

    #[test]
    fn test_row_major_order() {
        let colors = [[10, 0, 0], [20, 0, 0], [30, 0, 0], [40, 0, 0]];
        let tiles: Vec<Tile> = colors.iter().map(|&c| Tile::solid(2, 2, c)).collect();

        let mosaic = compose_mosaic(&tiles, columns(2)).unwrap();

        assert_eq!(mosaic.image().get_pixel(0, 0), &Rgb([10, 0, 0]));
        assert_eq!(mosaic.image().get_pixel(2, 0), &Rgb([20, 0, 0]));
        assert_eq!(mosaic.image().get_pixel(0, 2), &Rgb([30, 0, 0]));
        assert_eq!(mosaic.image().get_pixel(2, 2), &Rgb([40, 0, 0]));
    }

    #[test]
    fn test_deterministic() {
        let tiles: Vec<Tile> = (0..7)
            .map(|i| {
                Tile::from_image(RgbImage::from_fn(5 + i, 3 + i % 3, |x, y| {
                    Rgb([(x * 7) as u8, (y * 13) as u8, i as u8])
                }))
            })
            .collect();

        let a = compose_mosaic(&tiles, columns(3)).unwrap();
        let b = compose_mosaic(&tiles, columns(3)).unwrap();
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    // =========================================================================
    // Policies
    // =========================================================================

    #[test]
    fn test_canonical_policy_resizes_everything() {
        let tiles = vec![
            Tile::solid(460, 215, WHITE),
            Tile::solid(300, 100, WHITE),
            Tile::solid(184, 69, WHITE),
        ];
        let composer = MosaicComposer::new(CompositionPolicy::canonical(), columns(2));

        let mosaic = composer.compose(&tiles).unwrap();

        assert_eq!((mosaic.width(), mosaic.height()), (368, 138));
        assert_eq!(mosaic.padding_count(), 1);
    }

    #[test]
    fn test_center_crop_policy_matches_free_function() {
        let tiles = uniform(5, 8, 4);
        let composer = MosaicComposer::new(CompositionPolicy::CenterCrop, columns(2));
        assert_eq!(composer.compose(&tiles), compose_mosaic(&tiles, columns(2)));
    }

    #[test]
    fn test_canonical_policy_rejects_zero_size() {
        let composer = MosaicComposer::new(
            CompositionPolicy::Canonical {
                width: 0,
                height: 69,
            },
            columns(2),
        );
        assert!(composer.compose(&uniform(2, 4, 4)).is_none());
    }

    // =========================================================================
    // Geometry properties
    // =========================================================================

    fn tile_sizes() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((1u32..24, 1u32..24), 1..30)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_mosaic_geometry(sizes in tile_sizes(), cols in 1usize..8) {
            let tiles: Vec<Tile> = sizes.iter().map(|&(w, h)| Tile::solid(w, h, WHITE)).collect();
            let mosaic = compose_mosaic(&tiles, columns(cols)).unwrap();

            let groups: Vec<&[(u32, u32)]> = sizes.chunks(cols).collect();
            let expected_height: u32 = groups
                .iter()
                .map(|g| g.iter().map(|s| s.1).min().unwrap())
                .sum();
            let expected_width = groups
                .iter()
                .map(|g| g.iter().map(|s| s.0).min().unwrap() * cols as u32)
                .min()
                .unwrap();

            prop_assert_eq!(mosaic.rows(), sizes.len().div_ceil(cols));
            prop_assert_eq!(mosaic.height(), expected_height);
            prop_assert_eq!(mosaic.width(), expected_width);
        }

        #[test]
        fn prop_padding_count(count in 1usize..40, cols in 1usize..12) {
            let mosaic = compose_mosaic(&uniform(count, 2, 2), columns(cols)).unwrap();
            let remainder = count % cols;
            let expected = if remainder == 0 { 0 } else { cols - remainder };
            prop_assert_eq!(mosaic.padding_count(), expected);

            // Padding slots are black, real slots are not
            let last_row_y = mosaic.height() - 1;
            for slot in 0..cols {
                let pixel = mosaic.image().get_pixel(slot as u32 * 2, last_row_y);
                let is_padding = slot >= cols - expected;
                prop_assert_eq!(*pixel == BLACK, is_padding);
            }
        }
    }
}
