//! Common test fixtures for merge tests.
//!
//! Each fixture is a small set of georeferenced arrays describing a
//! compositing scenario. Fixtures are plain data so that any crate can wrap
//! them in its own raster type.

use ndarray::{Array2, Array3, Axis};
use raster_core::{array_bounds, Affine, Bounds};

use crate::generators::block_grid;

/// A georeferenced pixel array with an optional nodata sentinel.
#[derive(Debug, Clone)]
pub struct FixtureRaster<T> {
    pub name: &'static str,
    /// Pixel data shaped `(bands, rows, cols)`.
    pub data: Array3<T>,
    pub transform: Affine,
    pub nodata: Option<f64>,
}

impl<T> FixtureRaster<T> {
    fn single_band(
        name: &'static str,
        data: Array2<T>,
        transform: Affine,
        nodata: Option<f64>,
    ) -> Self {
        Self {
            name,
            data: data.insert_axis(Axis(0)),
            transform,
            nodata,
        }
    }

    pub fn bounds(&self) -> Bounds {
        let (_, rows, cols) = self.data.dim();
        array_bounds(rows, cols, &self.transform)
    }
}

/// Common transforms, written as GDAL geotransforms `[c, a, b, f, d, e]`.
pub mod transforms {
    use raster_core::Affine;

    /// 0.2 degree pixels anchored at (-114, 46).
    pub fn nw_fifth_degree() -> Affine {
        Affine::from_gdal([-114.0, 0.2, 0.0, 46.0, 0.0, -0.2])
    }

    /// 0.2 degree pixels anchored at (-113, 45).
    pub fn se_fifth_degree() -> Affine {
        Affine::from_gdal([-113.0, 0.2, 0.0, 45.0, 0.0, -0.2])
    }

    /// 0.2 x 0.1 degree pixels anchored at (-114, 46).
    pub fn nw_tall_pixels() -> Affine {
        Affine::from_gdal([-114.0, 0.2, 0.0, 46.0, 0.0, -0.1])
    }
}

/// Two coincident 10 x 10 `u8` rasters with nodata 1.
///
/// The first holds 255 at rows/cols 0..6, the second 254 at rows/cols 4..8;
/// everything else is nodata.
pub fn overlay_pair() -> [FixtureRaster<u8>; 2] {
    let transform = transforms::nw_fifth_degree();
    [
        FixtureRaster::single_band(
            "a",
            block_grid(10, 10, 1, 0..6, 0..6, 255),
            transform,
            Some(1.0),
        ),
        FixtureRaster::single_band(
            "b",
            block_grid(10, 10, 1, 4..8, 4..8, 254),
            transform,
            Some(1.0),
        ),
    ]
}

/// Like [`overlay_pair`] on 0.2 x 0.1 pixels, with background 0 and no
/// declared nodata.
pub fn undeclared_nodata_pair() -> [FixtureRaster<u8>; 2] {
    let transform = transforms::nw_tall_pixels();
    [
        FixtureRaster::single_band("a", block_grid(10, 10, 0, 0..6, 0..6, 255), transform, None),
        FixtureRaster::single_band("b", block_grid(10, 10, 0, 4..8, 4..8, 254), transform, None),
    ]
}

/// Two 10 x 10 `u8` rasters with nodata 0 overlapping by half a tile on
/// each axis: `nw` of ones and `se` of twos, offset by one degree.
pub fn overlapping_nw_se() -> [FixtureRaster<u8>; 2] {
    [
        FixtureRaster::single_band(
            "nw",
            Array2::from_elem((10, 10), 1),
            transforms::nw_fifth_degree(),
            Some(0.0),
        ),
        FixtureRaster::single_band(
            "se",
            Array2::from_elem((10, 10), 2),
            transforms::se_fifth_degree(),
            Some(0.0),
        ),
    ]
}

/// [`overlay_pair`] as `f64` with background and nodata 0.
pub fn float_pair() -> [FixtureRaster<f64>; 2] {
    let transform = transforms::nw_fifth_degree();
    [
        FixtureRaster::single_band(
            "one",
            block_grid(10, 10, 0.0, 0..6, 0..6, 255.0),
            transform,
            Some(0.0),
        ),
        FixtureRaster::single_band(
            "two",
            block_grid(10, 10, 0.0, 4..8, 4..8, 254.0),
            transform,
            Some(0.0),
        ),
    ]
}

/// Four single-pixel `u8` rasters at adjacent and overlapping placements.
///
/// Composited at 1 unit resolution they form:
///
/// ```text
/// [[  0 120 120  90]
///  [  0 120 120  90]
///  [  0  60   0   0]
///  [ 40   0   0   0]]
/// ```
pub fn tiny_tiles() -> [FixtureRaster<u8>; 4] {
    let pixel = |value: u8| Array2::from_elem((1, 1), value);
    [
        FixtureRaster::single_band(
            "a-sw",
            pixel(40),
            Affine::new(1.0, 0.0, 1.0, 0.0, -1.0, 1.0),
            None,
        ),
        FixtureRaster::single_band(
            "b-ct",
            pixel(60),
            Affine::new(1.0, 0.0, 2.0, 0.0, -1.0, 2.0),
            None,
        ),
        FixtureRaster::single_band(
            "c-ne",
            pixel(90),
            Affine::new(2.0, 0.0, 3.0, 0.0, -2.0, 4.0),
            None,
        ),
        FixtureRaster::single_band(
            "d-ne",
            pixel(120),
            Affine::new(2.0, 0.0, 2.0, 0.0, -2.0, 4.0),
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_pair_blocks() {
        let [a, b] = overlay_pair();
        assert_eq!(a.data[[0, 5, 5]], 255);
        assert_eq!(a.data[[0, 6, 6]], 1);
        assert_eq!(b.data[[0, 4, 4]], 254);
        assert_eq!(a.nodata, Some(1.0));
    }

    #[test]
    fn test_overlapping_bounds() {
        let [nw, se] = overlapping_nw_se();
        let nw_bounds = nw.bounds();
        assert!((nw_bounds.left + 114.0).abs() < 1e-9);
        assert!((nw_bounds.bottom - 44.0).abs() < 1e-9);
        let se_bounds = se.bounds();
        assert!((se_bounds.right + 111.0).abs() < 1e-9);
        assert!((se_bounds.bottom - 43.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_tiles_bounds() {
        let tiles = tiny_tiles();
        assert_eq!(tiles[0].bounds(), Bounds::new(1.0, 0.0, 2.0, 1.0));
        assert_eq!(tiles[2].bounds(), Bounds::new(3.0, 2.0, 5.0, 4.0));
        assert_eq!(tiles[3].bounds(), Bounds::new(2.0, 2.0, 4.0, 4.0));
    }
}
