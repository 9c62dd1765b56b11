//! Pixel windows and the algebra relating them to georeferenced bounds.
//!
//! A [`Window`] is a pair of half-open integer intervals, rows first. Windows
//! computed from bounds may extend past an array's extent (negative offsets or
//! stops beyond the shape); [`Window::crop`] is the explicit clip.
//!
//! Every float-to-pixel conversion in this crate goes through [`quantize`], so
//! [`index`], [`window`] and [`window_bounds`] agree on where pixel edges fall.

use serde::{Deserialize, Serialize};

use crate::affine::Affine;
use crate::bounds::Bounds;
use crate::error::{RasterError, RasterResult};

/// Number of decimal places of a pixel below which coordinates snap to the
/// nearest pixel edge.
pub const DEFAULT_PRECISION: i32 = 6;

/// Direction used when snapping a continuous pixel coordinate to an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down; used for window starts and point indices.
    Floor,
    /// Round up; used for window stops and output grid sizes.
    Ceil,
}

/// Snap a continuous pixel coordinate to an integer pixel edge.
///
/// Values within `10^-DEFAULT_PRECISION` of an edge are treated as lying on it,
/// so floating point noise in transform arithmetic never adds or drops a pixel.
pub fn quantize(value: f64, rounding: Rounding) -> i64 {
    let eps = 10f64.powi(-DEFAULT_PRECISION);
    match rounding {
        Rounding::Floor => (value + eps).floor() as i64,
        Rounding::Ceil => (value - eps).ceil() as i64,
    }
}

/// A rectangular region of pixel space: `((row_start, row_stop), (col_start, col_stop))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    pub rows: (i64, i64),
    pub cols: (i64, i64),
}

impl Window {
    /// Create a window from row and column intervals.
    pub fn new(rows: (i64, i64), cols: (i64, i64)) -> Self {
        debug_assert!(rows.0 <= rows.1 && cols.0 <= cols.1, "negative window extent");
        Self { rows, cols }
    }

    /// Create a window, rejecting intervals whose start exceeds the stop.
    pub fn try_new(rows: (i64, i64), cols: (i64, i64)) -> RasterResult<Self> {
        if rows.0 > rows.1 || cols.0 > cols.1 {
            return Err(RasterError::InvalidWindow(format!("{:?}", (rows, cols))));
        }
        Ok(Self { rows, cols })
    }

    /// The window covering an entire `height` x `width` array.
    pub fn full(height: usize, width: usize) -> Self {
        Self::new((0, height as i64), (0, width as i64))
    }

    /// The zero-area window at the origin.
    pub fn empty() -> Self {
        Self::new((0, 0), (0, 0))
    }

    pub fn height(&self) -> usize {
        (self.rows.1 - self.rows.0).max(0) as usize
    }

    pub fn width(&self) -> usize {
        (self.cols.1 - self.cols.0).max(0) as usize
    }

    /// `(height, width)` of the window.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// `(row_start, col_start)` of the window.
    pub fn offset(&self) -> (i64, i64) {
        (self.rows.0, self.cols.0)
    }

    /// True if the window covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// True if the window lies within `[0, height] x [0, width]`.
    pub fn is_within(&self, height: usize, width: usize) -> bool {
        self.rows.0 >= 0
            && self.cols.0 >= 0
            && self.rows.1 <= height as i64
            && self.cols.1 <= width as i64
    }

    /// Clip the window to an array of `height` x `width` pixels.
    ///
    /// A window wholly outside the array collapses to zero area at the nearest edge.
    pub fn crop(&self, height: usize, width: usize) -> Window {
        let clamp = |v: i64, max: usize| v.clamp(0, max as i64);
        let r0 = clamp(self.rows.0, height);
        let c0 = clamp(self.cols.0, width);
        Window::new(
            (r0, clamp(self.rows.1, height).max(r0)),
            (c0, clamp(self.cols.1, width).max(c0)),
        )
    }
}

impl From<((i64, i64), (i64, i64))> for Window {
    fn from((rows, cols): ((i64, i64), (i64, i64))) -> Self {
        Self::new(rows, cols)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.rows.0, self.rows.1, self.cols.0, self.cols.1
        )
    }
}

/// Continuous `(row, col)` pixel coordinate of a georeferenced point.
fn pixel_coords(x: f64, y: f64, inverse: &Affine) -> (f64, f64) {
    let (col, row) = inverse.apply(x, y);
    (row, col)
}

/// `(row, col)` of the pixel containing `(x, y)`.
///
/// The top-left corner of a dataset maps to `(0, 0)` and the bottom-right
/// corner to `(height, width)`, one past the last valid index.
pub fn index(x: f64, y: f64, transform: &Affine) -> RasterResult<(i64, i64)> {
    let inverse = transform.inverse()?;
    let (row, col) = pixel_coords(x, y, &inverse);
    Ok((quantize(row, Rounding::Floor), quantize(col, Rounding::Floor)))
}

/// The window of pixels covering `bounds` on the grid defined by `transform`.
///
/// Starts are floored and stops ceiled, so the window always covers the
/// requested bounds. Bounds beyond the grid yield coordinates outside the
/// array extent rather than an error.
pub fn window(bounds: &Bounds, transform: &Affine) -> RasterResult<Window> {
    let inverse = transform.inverse()?;
    let corners = [
        pixel_coords(bounds.left, bounds.top, &inverse),
        pixel_coords(bounds.right, bounds.top, &inverse),
        pixel_coords(bounds.left, bounds.bottom, &inverse),
        pixel_coords(bounds.right, bounds.bottom, &inverse),
    ];

    let (mut min_row, mut max_row) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_col, mut max_col) = (f64::INFINITY, f64::NEG_INFINITY);
    for (row, col) in corners {
        min_row = min_row.min(row);
        max_row = max_row.max(row);
        min_col = min_col.min(col);
        max_col = max_col.max(col);
    }

    let row_start = quantize(min_row, Rounding::Floor);
    let col_start = quantize(min_col, Rounding::Floor);
    Ok(Window::new(
        (row_start, quantize(max_row, Rounding::Ceil).max(row_start)),
        (col_start, quantize(max_col, Rounding::Ceil).max(col_start)),
    ))
}

/// Georeferenced bounds enclosing the pixel edges of `window`.
pub fn window_bounds(window: &Window, transform: &Affine) -> Bounds {
    let (r0, r1) = (window.rows.0 as f64, window.rows.1 as f64);
    let (c0, c1) = (window.cols.0 as f64, window.cols.1 as f64);

    Bounds::enclosing(&[
        transform.apply(c0, r0),
        transform.apply(c1, r0),
        transform.apply(c0, r1),
        transform.apply(c1, r1),
    ])
}

/// Smallest window containing every window in `windows`.
pub fn window_union(windows: &[Window]) -> RasterResult<Window> {
    let first = windows.first().ok_or(RasterError::EmptyWindowSet)?;

    Ok(windows.iter().skip(1).fold(*first, |acc, w| {
        Window::new(
            (acc.rows.0.min(w.rows.0), acc.rows.1.max(w.rows.1)),
            (acc.cols.0.min(w.cols.0), acc.cols.1.max(w.cols.1)),
        )
    }))
}

/// Largest start and smallest stop on each axis, possibly of negative extent.
fn overlap_extent(windows: &[Window]) -> Option<((i64, i64), (i64, i64))> {
    let first = windows.first()?;

    Some(windows.iter().skip(1).fold((first.rows, first.cols), |(rows, cols), w| {
        (
            (rows.0.max(w.rows.0), rows.1.min(w.rows.1)),
            (cols.0.max(w.cols.0), cols.1.min(w.cols.1)),
        )
    }))
}

/// The window common to every window in `windows`.
///
/// Windows that merely touch produce a zero-area result. Fails with
/// [`RasterError::WindowsDisjoint`] when any two windows are separated on
/// either axis.
pub fn window_intersection(windows: &[Window]) -> RasterResult<Window> {
    let (rows, cols) = overlap_extent(windows).ok_or(RasterError::EmptyWindowSet)?;

    if rows.0 > rows.1 || cols.0 > cols.1 {
        return Err(RasterError::WindowsDisjoint);
    }

    Ok(Window::new(rows, cols))
}

/// True exactly when [`window_intersection`] would succeed for `windows`.
pub fn windows_intersect(windows: &[Window]) -> bool {
    window_intersection(windows).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(rows: (i64, i64), cols: (i64, i64)) -> Window {
        Window::new(rows, cols)
    }

    #[test]
    fn test_quantize_snaps_near_edges() {
        assert_eq!(quantize(2.0 + 1e-9, Rounding::Ceil), 2);
        assert_eq!(quantize(2.0 - 1e-9, Rounding::Floor), 2);
        assert_eq!(quantize(2.5, Rounding::Floor), 2);
        assert_eq!(quantize(2.5, Rounding::Ceil), 3);
        assert_eq!(quantize(-3.33, Rounding::Floor), -4);
    }

    #[test]
    fn test_window_shape_helpers() {
        let win = w((2, 5), (1, 7));
        assert_eq!(win.shape(), (3, 6));
        assert_eq!(win.offset(), (2, 1));
        assert!(!win.is_empty());
        assert!(w((6, 6), (3, 5)).is_empty());
        assert_eq!(Window::full(4, 3), w((0, 4), (0, 3)));
    }

    #[test]
    fn test_crop() {
        assert_eq!(w((-2, 4), (3, 12)).crop(10, 10), w((0, 4), (3, 10)));
        assert_eq!(w((12, 20), (0, 5)).crop(10, 10), w((10, 10), (0, 5)));
        assert!(w((0, 4), (3, 10)).is_within(10, 10));
        assert!(!w((-1, 4), (3, 10)).is_within(10, 10));
    }

    #[test]
    fn test_try_new_rejects_inverted() {
        assert!(Window::try_new((5, 2), (0, 1)).is_err());
        assert_eq!(Window::try_new((2, 5), (0, 1)), Ok(w((2, 5), (0, 1))));
    }

    #[test]
    fn test_display() {
        assert_eq!(w((0, 6), (1, 6)).to_string(), "((0, 6), (1, 6))");
    }

    #[test]
    fn test_union_and_intersection_empty_set() {
        assert_eq!(window_union(&[]), Err(RasterError::EmptyWindowSet));
        assert_eq!(window_intersection(&[]), Err(RasterError::EmptyWindowSet));
        assert!(!windows_intersect(&[]));
    }

    #[test]
    fn test_window_south_up_transform() {
        // Rows grow northward.
        let t = Affine::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let win = window(&Bounds::new(1.0, 2.0, 3.0, 5.0), &t).unwrap();
        assert_eq!(win, w((2, 5), (1, 3)));
    }
}
