//! Detection of the window bounding the valid pixels of an array.

use ndarray::{Array2, ArrayView, ArrayView3, Axis, Dimension, Ix3, Zip};

use crate::error::{RasterError, RasterResult};
use crate::masked::Validity;
use crate::window::Window;

/// Promote a 2-D or 3-D view to `(bands, rows, cols)`.
fn as_banded<'a, T, D: Dimension>(data: ArrayView<'a, T, D>) -> RasterResult<ArrayView3<'a, T>> {
    let dyn_view = data.into_dyn();
    let banded = match dyn_view.ndim() {
        2 => dyn_view.insert_axis(Axis(0)),
        3 => dyn_view,
        n => {
            return Err(RasterError::shape_mismatch(format!(
                "expected a 2-D or 3-D array, got {} dimensions",
                n
            )))
        }
    };

    banded
        .into_dimensionality::<Ix3>()
        .map_err(|e| RasterError::shape_mismatch(e.to_string()))
}

/// Per-pixel flag: valid in at least one band.
fn valid_pixels<T: Copy + PartialEq>(
    data: &ArrayView3<'_, T>,
    validity: &Validity<'_, T>,
) -> RasterResult<Option<Array2<bool>>> {
    let (bands, rows, cols) = data.dim();

    match validity {
        Validity::All => Ok(None),
        Validity::Nodata(_) => {
            let mut valid = Array2::from_elem((rows, cols), false);
            for ((b, r, c), &v) in data.indexed_iter() {
                if validity.is_valid(v, &[b, r, c]) {
                    valid[[r, c]] = true;
                }
            }
            Ok(Some(valid))
        }
        Validity::Mask(mask) => {
            let mask = as_banded(mask.view())?;
            if mask.dim() != (bands, rows, cols) {
                return Err(RasterError::shape_mismatch(format!(
                    "mask {:?} does not match data {:?}",
                    mask.dim(),
                    (bands, rows, cols)
                )));
            }
            Ok(Some(mask.map(|&masked| !masked).fold_axis(
                Axis(0),
                false,
                |acc, &valid| *acc || valid,
            )))
        }
    }
}

/// First and one-past-last index of `true` in `flags`.
fn span(flags: impl Iterator<Item = bool> + Clone) -> Option<(i64, i64)> {
    let first = flags.clone().position(|f| f)?;
    let last = flags.enumerate().filter(|(_, f)| *f).map(|(i, _)| i).last()?;
    Some((first as i64, last as i64 + 1))
}

/// Minimal window bounding every valid pixel of `data`.
///
/// `data` is a 2-D array or a 3-D `(bands, rows, cols)` array. A pixel is
/// valid if it is valid in at least one band. With [`Validity::All`] the full
/// extent is returned; if nothing is valid the result is `((0, 0), (0, 0))`.
/// Scattered valid regions are summarised by their common bounding window.
pub fn get_data_window<T, D>(
    data: ArrayView<'_, T, D>,
    validity: &Validity<'_, T>,
) -> RasterResult<Window>
where
    T: Copy + PartialEq,
    D: Dimension,
{
    let data = as_banded(data)?;
    let (_, rows, cols) = data.dim();

    let valid = match valid_pixels(&data, validity)? {
        Some(valid) => valid,
        None => return Ok(Window::full(rows, cols)),
    };

    let mut row_any = vec![false; rows];
    let mut col_any = vec![false; cols];
    Zip::indexed(&valid).for_each(|(r, c), &v| {
        if v {
            row_any[r] = true;
            col_any[c] = true;
        }
    });

    match (span(row_any.into_iter()), span(col_any.into_iter())) {
        (Some(row_span), Some(col_span)) => Ok(Window::new(row_span, col_span)),
        _ => Ok(Window::empty()),
    }
}
