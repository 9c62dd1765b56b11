//! Error types for raster coordinate and window operations.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised by the window algebra and array helpers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RasterError {
    // === Window Errors ===
    #[error("windows do not intersect")]
    WindowsDisjoint,

    #[error("at least one window is required")]
    EmptyWindowSet,

    #[error("invalid window {0}: start exceeds stop")]
    InvalidWindow(String),

    // === Transform Errors ===
    #[error("degenerate affine transform (determinant {0})")]
    DegenerateTransform(f64),

    // === Array Errors ===
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl RasterError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
