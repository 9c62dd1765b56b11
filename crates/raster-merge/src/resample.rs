//! Resampling of masked pixel arrays to a new shape.
//!
//! Destination pixels are mapped to the source by their centres, so a source
//! pixel contributes to exactly the destination pixels whose centres fall
//! inside it.

use ndarray::{Array3, ArrayView2};
use num_traits::{NumCast, ToPrimitive};
use raster_core::{MaskedArray, Pixel};

use crate::types::Resampling;

/// Continuous source coordinate of a destination pixel centre.
#[inline]
fn centre_to_source(dst: usize, src_len: usize, dst_len: usize) -> f64 {
    (dst as f64 + 0.5) * src_len as f64 / dst_len as f64
}

/// Nearest neighbor sampling.
///
/// Returns the source value and mask of the pixel containing the centre of
/// destination pixel `(row, col)`.
pub fn nearest_sample<T: Copy>(
    data: &ArrayView2<'_, T>,
    mask: Option<&ArrayView2<'_, bool>>,
    dst_shape: (usize, usize),
    row: usize,
    col: usize,
) -> (T, bool) {
    let (src_rows, src_cols) = data.dim();
    let sr = (centre_to_source(row, src_rows, dst_shape.0).floor() as usize).min(src_rows - 1);
    let sc = (centre_to_source(col, src_cols, dst_shape.1).floor() as usize).min(src_cols - 1);

    let masked = mask.map_or(false, |m| m[[sr, sc]]);
    (data[[sr, sc]], masked)
}

/// Bilinear interpolation between the four source pixels surrounding the
/// centre of destination pixel `(row, col)`.
///
/// If any contributing pixel is masked the result is masked and carries the
/// nearest value instead.
pub fn bilinear_sample<T: Pixel>(
    data: &ArrayView2<'_, T>,
    mask: Option<&ArrayView2<'_, bool>>,
    dst_shape: (usize, usize),
    row: usize,
    col: usize,
    integral: bool,
) -> (T, bool) {
    let (src_rows, src_cols) = data.dim();
    let y = (centre_to_source(row, src_rows, dst_shape.0) - 0.5).clamp(0.0, (src_rows - 1) as f64);
    let x = (centre_to_source(col, src_cols, dst_shape.1) - 0.5).clamp(0.0, (src_cols - 1) as f64);

    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(src_rows - 1);
    let x1 = (x0 + 1).min(src_cols - 1);

    if let Some(m) = mask {
        if m[[y0, x0]] || m[[y0, x1]] || m[[y1, x0]] || m[[y1, x1]] {
            return nearest_sample(data, mask, dst_shape, row, col);
        }
    }

    let corners = [data[[y0, x0]], data[[y0, x1]], data[[y1, x0]], data[[y1, x1]]];
    let values: Option<Vec<f64>> = corners.iter().map(|v| v.to_f64()).collect();
    let Some(v) = values else {
        return nearest_sample(data, mask, dst_shape, row, col);
    };

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;
    let top = v[0] * (1.0 - xf) + v[1] * xf;
    let bottom = v[2] * (1.0 - xf) + v[3] * xf;
    let value = top * (1.0 - yf) + bottom * yf;
    let value = if integral { value.round() } else { value };

    match <T as NumCast>::from(value) {
        Some(out) => (out, false),
        None => nearest_sample(data, mask, dst_shape, row, col),
    }
}

/// True if `T` cannot hold fractional values.
fn is_integral<T: Pixel>() -> bool {
    <T as NumCast>::from(0.5)
        .and_then(|v: T| v.to_f64())
        .map_or(true, |v| v == 0.0)
}

/// Resample every band of `src` to `(rows, cols)`.
///
/// An empty source yields a fully masked, zero-filled result.
pub fn resample<T: Pixel>(
    src: &MaskedArray<T>,
    dst_shape: (usize, usize),
    method: Resampling,
) -> MaskedArray<T> {
    let (bands, src_rows, src_cols) = src.shape();
    let (rows, cols) = dst_shape;

    if (src_rows, src_cols) == dst_shape {
        return src.clone();
    }

    let mut data = Array3::<T>::zeros((bands, rows, cols));
    let mut mask = Array3::from_elem((bands, rows, cols), true);

    if src_rows == 0 || src_cols == 0 {
        // Every destination pixel stays masked.
        return MaskedArray::with_mask(data, mask).unwrap_or_else(|_| src.clone());
    }

    let integral = is_integral::<T>();
    for b in 0..bands {
        let band = src.data().index_axis(ndarray::Axis(0), b);
        let band_mask = src.mask().map(|m| m.index_axis(ndarray::Axis(0), b));

        for r in 0..rows {
            for c in 0..cols {
                let (value, masked) = match method {
                    Resampling::Nearest => {
                        nearest_sample(&band, band_mask.as_ref(), dst_shape, r, c)
                    }
                    Resampling::Bilinear => {
                        bilinear_sample(&band, band_mask.as_ref(), dst_shape, r, c, integral)
                    }
                };
                data[[b, r, c]] = value;
                mask[[b, r, c]] = masked;
            }
        }
    }

    match src.mask() {
        Some(_) => MaskedArray::with_mask(data, mask).unwrap_or_else(|_| src.clone()),
        None => MaskedArray::new(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_nearest_upsample() {
        let src = MaskedArray::new(array![[[1u8, 2], [3, 4]]]);
        let out = resample(&src, (4, 4), Resampling::Nearest);

        assert_eq!(
            out.data(),
            &array![[[1u8, 1, 2, 2], [1, 1, 2, 2], [3, 3, 4, 4], [3, 3, 4, 4]]]
        );
        assert!(out.mask().is_none());
    }

    #[test]
    fn test_nearest_single_pixel_fill() {
        let src = MaskedArray::new(array![[[120u8]]]);
        let out = resample(&src, (1, 2), Resampling::Nearest);
        assert_eq!(out.data(), &array![[[120u8, 120]]]);
    }

    #[test]
    fn test_nearest_downsample() {
        let src = MaskedArray::new(array![[
            [1.0f32, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0]
        ]]);
        let out = resample(&src, (2, 2), Resampling::Nearest);
        assert_eq!(out.data(), &array![[[6.0f32, 8.0], [14.0, 16.0]]]);
    }

    #[test]
    fn test_nearest_carries_mask() {
        let data = array![[[1u8, 2], [3, 4]]];
        let mask = array![[[false, true], [false, false]]];
        let src = MaskedArray::with_mask(data, mask).unwrap();
        let out = resample(&src, (2, 4), Resampling::Nearest);

        assert!(out.is_valid(0, 0, 1));
        assert!(!out.is_valid(0, 0, 2));
        assert!(!out.is_valid(0, 0, 3));
        assert!(out.is_valid(0, 1, 3));
    }

    #[test]
    fn test_bilinear_centre() {
        let src = MaskedArray::new(array![[[1.0f64, 2.0], [3.0, 4.0]]]);
        let out = resample(&src, (4, 4), Resampling::Bilinear);

        // Corners clamp to the source corners
        assert!((out.data()[[0, 0, 0]] - 1.0).abs() < 1e-9);
        assert!((out.data()[[0, 3, 3]] - 4.0).abs() < 1e-9);
        // Inner pixels interpolate
        assert!((out.data()[[0, 1, 1]] - 1.75).abs() < 1e-9);
    }

    #[test]
    fn test_bilinear_integer_rounds() {
        let src = MaskedArray::new(array![[[0u8, 3]]]);
        let out = resample(&src, (1, 4), Resampling::Bilinear);
        assert_eq!(out.data(), &array![[[0u8, 1, 2, 3]]]);
    }

    #[test]
    fn test_bilinear_masked_neighbour() {
        let data = array![[[1.0f32, 2.0], [3.0, 4.0]]];
        let mask = array![[[true, false], [false, false]]];
        let src = MaskedArray::with_mask(data, mask).unwrap();
        let out = resample(&src, (4, 4), Resampling::Bilinear);

        assert!(!out.is_valid(0, 1, 1));
        assert!(out.is_valid(0, 3, 3));
    }

    #[test]
    fn test_empty_source_is_masked() {
        let src = MaskedArray::new(Array3::<u8>::zeros((1, 0, 0)));
        let out = resample(&src, (2, 2), Resampling::Nearest);
        assert_eq!(out.shape(), (1, 2, 2));
        assert!(!out.is_valid(0, 1, 1));
    }

    #[test]
    fn test_is_integral() {
        assert!(is_integral::<u8>());
        assert!(is_integral::<i32>());
        assert!(!is_integral::<f32>());
    }
}
