//! An in-memory raster dataset.

use ndarray::{s, Array2, Array3, Axis, Zip};
use num_traits::Zero;
use raster_core::{nodata_as, same_value, Affine, MaskedArray, Pixel, RasterError, Window};

use crate::error::Result;
use crate::resample::resample;
use crate::source::RasterSource;
use crate::types::Resampling;

/// A georeferenced raster held entirely in memory.
///
/// Reads are boundless: pixels of the requested window that fall outside the
/// array come back masked and filled with the nodata value (or zero).
#[derive(Debug, Clone)]
pub struct MemoryRaster<T> {
    data: Array3<T>,
    mask: Option<Array3<bool>>,
    transform: Affine,
    nodata: Option<f64>,
}

impl<T: Pixel> MemoryRaster<T> {
    /// Create a raster from `(bands, rows, cols)` data.
    pub fn new(data: Array3<T>, transform: Affine) -> Self {
        Self {
            data,
            mask: None,
            transform,
            nodata: None,
        }
    }

    /// Create a single-band raster.
    pub fn from_2d(data: Array2<T>, transform: Affine) -> Self {
        Self::new(data.insert_axis(Axis(0)), transform)
    }

    /// Declare a nodata sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// Attach a mask (`true` = invalid) of the same shape as the data.
    pub fn with_mask(mut self, mask: Array3<bool>) -> Result<Self> {
        if mask.dim() != self.data.dim() {
            return Err(RasterError::shape_mismatch(format!(
                "mask {:?} does not match data {:?}",
                mask.dim(),
                self.data.dim()
            ))
            .into());
        }
        self.mask = Some(mask);
        Ok(self)
    }

    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Copy `window` out of the array at native resolution.
    fn read_native(&self, window: &Window) -> Result<MaskedArray<T>> {
        let (bands, height, width) = self.data.dim();
        let (rows, cols) = window.shape();

        let nodata = self.nodata.and_then(nodata_as::<T>);
        let needs_mask =
            self.mask.is_some() || nodata.is_some() || !window.is_within(height, width);

        let fill = nodata.unwrap_or_else(T::zero);
        let mut data = Array3::from_elem((bands, rows, cols), fill);
        let mut mask = Array3::from_elem((bands, rows, cols), true);

        let clipped = window.crop(height, width);
        if !clipped.is_empty() {
            let (r0, c0) = (clipped.rows.0 as usize, clipped.cols.0 as usize);
            let (r1, c1) = (clipped.rows.1 as usize, clipped.cols.1 as usize);
            let dr = (clipped.rows.0 - window.rows.0) as usize;
            let dc = (clipped.cols.0 - window.cols.0) as usize;
            let (h, w) = clipped.shape();

            let src = self.data.slice(s![.., r0..r1, c0..c1]);
            data.slice_mut(s![.., dr..dr + h, dc..dc + w]).assign(&src);

            let mut region_mask = mask.slice_mut(s![.., dr..dr + h, dc..dc + w]);
            Zip::from(&mut region_mask).and(&src).for_each(|m, &v| {
                *m = nodata.map_or(false, |nd| same_value(v, nd));
            });
            if let Some(own) = &self.mask {
                Zip::from(&mut region_mask)
                    .and(&own.slice(s![.., r0..r1, c0..c1]))
                    .for_each(|m, &o| *m = *m || o);
            }
        }

        if needs_mask {
            Ok(MaskedArray::with_mask(data, mask)?)
        } else {
            Ok(MaskedArray::new(data))
        }
    }
}

impl<T: Pixel> RasterSource for MemoryRaster<T> {
    type Pixel = T;

    fn shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.data.dim();
        (rows, cols)
    }

    fn count(&self) -> usize {
        self.data.dim().0
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn read(
        &self,
        window: &Window,
        out_shape: (usize, usize),
        resampling: Resampling,
    ) -> Result<MaskedArray<T>> {
        let native = self.read_native(window)?;
        Ok(resample(&native, out_shape, resampling))
    }
}
