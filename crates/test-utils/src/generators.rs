//! Test data generators for synthetic pixel arrays.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use std::ops::Range;

use ndarray::{s, Array2, Array3};

/// Creates a grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data landed in the right place by
/// checking that `grid[[row, col]] == col * 1000 + row`.
///
/// # Example
///
/// ```
/// use test_utils::indexed_grid;
///
/// let grid = indexed_grid(5, 10);
/// assert_eq!(grid.dim(), (5, 10));
/// assert_eq!(grid[[0, 0]], 0.0);
/// assert_eq!(grid[[0, 1]], 1000.0);
/// assert_eq!(grid[[1, 0]], 1.0);
/// ```
pub fn indexed_grid(height: usize, width: usize) -> Array2<f32> {
    Array2::from_shape_fn((height, width), |(row, col)| (col * 1000 + row) as f32)
}

/// Creates a `height` x `width` grid of `background` with `value` written
/// into the rectangle `rows` x `cols`.
///
/// # Example
///
/// ```
/// use test_utils::block_grid;
///
/// let grid = block_grid(10, 10, 1u8, 0..6, 0..6, 255);
/// assert_eq!(grid[[5, 5]], 255);
/// assert_eq!(grid[[6, 6]], 1);
/// ```
pub fn block_grid<T: Clone>(
    height: usize,
    width: usize,
    background: T,
    rows: Range<usize>,
    cols: Range<usize>,
    value: T,
) -> Array2<T> {
    let mut grid = Array2::from_elem((height, width), background);
    grid.slice_mut(s![rows, cols]).fill(value);
    grid
}

/// Creates a `(bands, height, width)` array filled with `value`.
pub fn filled_bands<T: Clone>(bands: usize, height: usize, width: usize, value: T) -> Array3<T> {
    Array3::from_elem((bands, height, width), value)
}

/// Creates a grid with values from `low` (top-left) to `high` (bottom-right).
///
/// Useful for checking interpolation, where every output value must lie
/// between its neighbours.
pub fn gradient_grid(height: usize, width: usize, low: f64, high: f64) -> Array2<f64> {
    let span = (height + width).saturating_sub(2).max(1) as f64;
    Array2::from_shape_fn((height, width), |(row, col)| {
        low + (high - low) * (row + col) as f64 / span
    })
}
