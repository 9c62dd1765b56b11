//! Banded pixel arrays with optional validity masks.

use std::fmt::Debug;

use ndarray::{Array2, Array3, ArrayViewD, Axis, IxDyn};
use num_traits::{NumCast, ToPrimitive, Zero};

use crate::data_window::get_data_window;
use crate::error::{RasterError, RasterResult};
use crate::window::Window;

/// Element type of a raster array.
pub trait Pixel: Copy + PartialEq + NumCast + Zero + Debug + Send + Sync + 'static {}

impl<T> Pixel for T where T: Copy + PartialEq + NumCast + Zero + Debug + Send + Sync + 'static {}

/// Equality that also treats NaN as equal to NaN, for matching nodata sentinels.
#[inline]
pub fn same_value<T: PartialEq>(a: T, b: T) -> bool {
    #[allow(clippy::eq_op)]
    let both_nan = a != a && b != b;
    a == b || both_nan
}

/// Convert a nodata sentinel to the pixel type, or `None` if it is not representable.
///
/// A sentinel is representable when the cast keeps its value, up to the
/// rounding of a floating point target. Fractional sentinels are never
/// representable in integer types: `1.5` is not truncated to `1`.
pub fn nodata_as<T: NumCast>(nodata: f64) -> Option<T> {
    let value = T::from(nodata)?;
    let back = value.to_f64()?;
    let tolerance = nodata.abs() * <f64 as From<f32>>::from(f32::EPSILON);
    (same_value(back, nodata) || (back - nodata).abs() <= tolerance).then_some(value)
}

/// The source of per-pixel validity for an array.
///
/// Masks follow the convention that `true` marks an invalid pixel.
#[derive(Debug, Clone)]
pub enum Validity<'a, T> {
    /// Explicit mask with the same shape as the data.
    Mask(ArrayViewD<'a, bool>),
    /// Pixels equal to the sentinel are invalid.
    Nodata(T),
    /// Every pixel is valid.
    All,
}

impl<'a, T: Copy + PartialEq> Validity<'a, T> {
    /// Build a nodata validity from a declared `f64` sentinel.
    ///
    /// A sentinel outside the range of `T` can never match, so it degrades to [`Validity::All`].
    pub fn from_nodata(nodata: Option<f64>) -> Self
    where
        T: NumCast,
    {
        match nodata.and_then(nodata_as::<T>) {
            Some(value) => Validity::Nodata(value),
            None => Validity::All,
        }
    }

    /// Whether the element `value` at `index` is valid.
    #[inline]
    pub fn is_valid(&self, value: T, index: &[usize]) -> bool {
        match self {
            Validity::Mask(mask) => !mask[IxDyn(index)],
            Validity::Nodata(nodata) => !same_value(value, *nodata),
            Validity::All => true,
        }
    }
}

/// A `(bands, rows, cols)` pixel array with an optional mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray<T> {
    data: Array3<T>,
    mask: Option<Array3<bool>>,
}

impl<T: Pixel> MaskedArray<T> {
    /// Wrap an array in which every pixel is valid.
    pub fn new(data: Array3<T>) -> Self {
        Self { data, mask: None }
    }

    /// Wrap a single-band 2-D array.
    pub fn from_2d(data: Array2<T>) -> Self {
        Self::new(data.insert_axis(Axis(0)))
    }

    /// Wrap an array with an explicit mask of identical shape.
    pub fn with_mask(data: Array3<T>, mask: Array3<bool>) -> RasterResult<Self> {
        if data.dim() != mask.dim() {
            return Err(RasterError::shape_mismatch(format!(
                "mask {:?} does not match data {:?}",
                mask.dim(),
                data.dim()
            )));
        }
        Ok(Self {
            data,
            mask: Some(mask),
        })
    }

    /// Mask every pixel equal to `nodata`.
    pub fn from_nodata(data: Array3<T>, nodata: f64) -> Self {
        match nodata_as::<T>(nodata) {
            Some(sentinel) => {
                let mask = data.mapv(|v| same_value(v, sentinel));
                Self {
                    data,
                    mask: Some(mask),
                }
            }
            None => Self::new(data),
        }
    }

    /// `(bands, rows, cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn bands(&self) -> usize {
        self.data.dim().0
    }

    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    pub fn mask(&self) -> Option<&Array3<bool>> {
        self.mask.as_ref()
    }

    /// Whether the pixel at `(band, row, col)` is valid.
    pub fn is_valid(&self, band: usize, row: usize, col: usize) -> bool {
        self.mask
            .as_ref()
            .map_or(true, |mask| !mask[[band, row, col]])
    }

    /// Validity source describing this array.
    pub fn validity(&self) -> Validity<'_, T> {
        match &self.mask {
            Some(mask) => Validity::Mask(mask.view().into_dyn()),
            None => Validity::All,
        }
    }

    /// Minimal window bounding every pixel valid in at least one band.
    pub fn data_window(&self) -> Window {
        // Shapes were checked on construction.
        get_data_window(self.data.view(), &self.validity()).unwrap_or_else(|_| Window::empty())
    }

    pub fn into_parts(self) -> (Array3<T>, Option<Array3<bool>>) {
        (self.data, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_same_value_nan() {
        assert!(same_value(f64::NAN, f64::NAN));
        assert!(!same_value(1.0, f64::NAN));
        assert!(same_value(3u8, 3u8));
    }

    #[test]
    fn test_nodata_as_out_of_range() {
        assert_eq!(nodata_as::<u8>(-1.0), None);
        assert_eq!(nodata_as::<u8>(255.0), Some(255));
        assert_eq!(nodata_as::<f32>(-1.5), Some(-1.5));
    }

    #[test]
    fn test_nodata_as_rejects_fractional_integers() {
        assert_eq!(nodata_as::<u8>(1.5), None);
        assert_eq!(nodata_as::<u8>(254.7), None);
        assert_eq!(nodata_as::<i16>(-0.5), None);
        assert_eq!(nodata_as::<i16>(-32768.0), Some(-32768));
    }

    #[test]
    fn test_nodata_as_float_targets() {
        assert_eq!(nodata_as::<f32>(0.1), Some(0.1));
        assert_eq!(nodata_as::<f64>(-9999.25), Some(-9999.25));
        assert!(nodata_as::<f32>(f64::NAN).is_some_and(f32::is_nan));
        assert_eq!(nodata_as::<f32>(f64::INFINITY), Some(f32::INFINITY));
    }

    #[test]
    fn test_fractional_nodata_keeps_integer_pixels_valid() {
        let data = Array3::from_elem((1, 1, 2), 1u8);
        let masked = MaskedArray::from_nodata(data, 1.5);
        assert!(masked.mask().is_none());
        assert!(masked.is_valid(0, 0, 1));
    }

    #[test]
    fn test_with_mask_shape_check() {
        let data = Array3::<u8>::zeros((1, 2, 2));
        assert!(MaskedArray::with_mask(data.clone(), Array3::from_elem((1, 2, 3), false)).is_err());
        assert!(MaskedArray::with_mask(data, Array3::from_elem((1, 2, 2), false)).is_ok());
    }

    #[test]
    fn test_from_nodata_masks_sentinel() {
        let data = array![[[1u8, 0], [0, 7]]];
        let masked = MaskedArray::from_nodata(data, 0.0);
        assert!(masked.is_valid(0, 0, 0));
        assert!(!masked.is_valid(0, 0, 1));
        assert!(masked.is_valid(0, 1, 1));
    }

    #[test]
    fn test_from_nodata_unrepresentable_keeps_all_valid() {
        let masked = MaskedArray::from_nodata(array![[[1u8, 0]]], -1.0);
        assert!(masked.mask().is_none());
    }

    #[test]
    fn test_validity_from_nodata() {
        let v: Validity<'_, u8> = Validity::from_nodata(Some(1.0));
        assert!(!v.is_valid(1, &[0, 0, 0]));
        assert!(v.is_valid(2, &[0, 0, 0]));

        let v: Validity<'_, u8> = Validity::from_nodata(Some(300.0));
        assert!(matches!(v, Validity::All));
    }
}
