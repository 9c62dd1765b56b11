//! Shared test utilities for the raster workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Pixel array generators
//! - Canonical merge fixtures (georeferenced arrays with nodata)
//! - Approximate-equality assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two bounds rectangles, edge by edge.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_bounds_approx_eq;
///
/// assert_bounds_approx_eq!(mosaic.bounds(), Bounds::new(-114.0, 43.0, -111.0, 46.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_bounds_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        $crate::assert_approx_eq!(left.left, right.left, $epsilon);
        $crate::assert_approx_eq!(left.bottom, right.bottom, $epsilon);
        $crate::assert_approx_eq!(left.right, right.right, $epsilon);
        $crate::assert_approx_eq!(left.top, right.top, $epsilon);
    }};
}
