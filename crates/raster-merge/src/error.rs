//! Error types for raster merging.

use raster_core::RasterError;
use thiserror::Error;

/// Errors that can occur while merging rasters.
#[derive(Error, Debug)]
pub enum MergeError {
    /// No input rasters were supplied.
    #[error("at least one source raster is required")]
    NoSources,

    /// A source has a different band count than the first source.
    #[error("source {index} has {found} bands, expected {expected}")]
    BandMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A source does not overlap the output extent at all.
    #[error("source {index} lies entirely outside the output bounds")]
    SourceOutsideExtent { index: usize },

    /// The requested or derived output resolution is unusable.
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),

    /// The requested output bounds are unusable.
    #[error("invalid output bounds: {0}")]
    InvalidBounds(String),

    /// A source failed to deliver pixel data.
    #[error("failed to read source data: {0}")]
    ReadFailed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Window or transform arithmetic failed.
    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl MergeError {
    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Create an InvalidResolution error.
    pub fn invalid_resolution(msg: impl Into<String>) -> Self {
        Self::InvalidResolution(msg.into())
    }

    /// Create an InvalidBounds error.
    pub fn invalid_bounds(msg: impl Into<String>) -> Self {
        Self::InvalidBounds(msg.into())
    }

    /// Create a ConfigError.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
