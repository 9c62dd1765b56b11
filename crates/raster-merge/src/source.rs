//! The contract a raster dataset must satisfy to take part in a merge.

use raster_core::{array_bounds, Affine, Bounds, MaskedArray, Pixel, RasterResult, Window};

use crate::error::Result;
use crate::types::Resampling;

/// Read access to a georeferenced raster dataset.
///
/// Opening files, decoding formats and reprojection live behind this trait;
/// the merge engine only needs geometry, a nodata sentinel and windowed reads.
pub trait RasterSource: Sync {
    /// Element type of the dataset's pixels.
    type Pixel: Pixel;

    /// `(height, width)` in pixels.
    fn shape(&self) -> (usize, usize);

    /// Number of bands.
    fn count(&self) -> usize;

    /// Transform from pixel to georeferenced coordinates.
    fn transform(&self) -> Affine;

    /// Declared nodata sentinel, if any.
    fn nodata(&self) -> Option<f64>;

    /// Read every band of `window`, resampled to `out_shape` `(rows, cols)`.
    ///
    /// `window` may extend past the dataset; pixels outside it come back
    /// masked. The returned array is shaped `(count, rows, cols)`.
    fn read(
        &self,
        window: &Window,
        out_shape: (usize, usize),
        resampling: Resampling,
    ) -> Result<MaskedArray<Self::Pixel>>;

    /// Georeferenced extent of the dataset.
    fn bounds(&self) -> Bounds {
        let (height, width) = self.shape();
        array_bounds(height, width, &self.transform())
    }

    /// Pixel size along each axis.
    fn res(&self) -> (f64, f64) {
        self.transform().res()
    }

    /// `(row, col)` of the pixel containing `(x, y)`.
    fn index(&self, x: f64, y: f64) -> RasterResult<(i64, i64)> {
        raster_core::index(x, y, &self.transform())
    }

    /// Pixel window covering `bounds`; may extend past the dataset.
    fn window(&self, bounds: &Bounds) -> RasterResult<Window> {
        raster_core::window(bounds, &self.transform())
    }

    /// Georeferenced bounds of `window`.
    fn window_bounds(&self, window: &Window) -> Bounds {
        raster_core::window_bounds(window, &self.transform())
    }
}

impl<S: RasterSource + ?Sized> RasterSource for &S {
    type Pixel = S::Pixel;

    fn shape(&self) -> (usize, usize) {
        (**self).shape()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn transform(&self) -> Affine {
        (**self).transform()
    }

    fn nodata(&self) -> Option<f64> {
        (**self).nodata()
    }

    fn read(
        &self,
        window: &Window,
        out_shape: (usize, usize),
        resampling: Resampling,
    ) -> Result<MaskedArray<Self::Pixel>> {
        (**self).read(window, out_shape, resampling)
    }
}
