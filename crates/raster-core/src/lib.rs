//! Coordinate algebra for georeferenced raster arrays.
//!
//! - [`affine`]: the [`Affine`] transform between pixel and map coordinates
//! - [`bounds`]: georeferenced rectangles
//! - [`window`]: pixel windows, bounds/window conversion and window set operations
//! - [`masked`]: banded arrays with validity masks
//! - [`data_window`]: the window bounding an array's valid pixels

pub mod affine;
pub mod bounds;
pub mod data_window;
pub mod error;
pub mod masked;
pub mod window;

pub use affine::{array_bounds, Affine};
pub use bounds::Bounds;
pub use data_window::get_data_window;
pub use error::{RasterError, RasterResult};
pub use masked::{nodata_as, same_value, MaskedArray, Pixel, Validity};
pub use window::{
    index, quantize, window, window_bounds, window_intersection, window_union,
    windows_intersect, Rounding, Window, DEFAULT_PRECISION,
};
