//! Core types for raster merging.

use ndarray::Array3;
use raster_core::{array_bounds, Affine, Bounds};
use serde::{Deserialize, Serialize};

/// Resampling method used when a source is read at a different resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    /// Nearest neighbor (preserves exact values).
    #[default]
    Nearest,
    /// Bilinear interpolation of pixel centres.
    Bilinear,
}

impl Resampling {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bilinear" | "linear" => Self::Bilinear,
            _ => Self::Nearest,
        }
    }
}

impl std::fmt::Display for Resampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Output pixel size, in coordinate units per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if both axes are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

/// A single value applies to both axes.
impl From<f64> for Resolution {
    fn from(res: f64) -> Self {
        Self::new(res, res)
    }
}

impl From<(f64, f64)> for Resolution {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Per-call merge parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MergeOptions {
    /// Output extent; defaults to the union of all source bounds.
    pub bounds: Option<Bounds>,
    /// Output resolution; defaults to the finest source resolution.
    pub res: Option<Resolution>,
    /// Fill value for unwritten pixels, overriding every source's nodata.
    pub nodata: Option<f64>,
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_res(mut self, res: impl Into<Resolution>) -> Self {
        self.res = Some(res.into());
        self
    }

    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }
}

/// Non-fatal conditions encountered during a merge.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeWarning {
    /// Sources declare different nodata values and none was supplied.
    NodataMismatch {
        values: Vec<Option<f64>>,
        chosen: Option<f64>,
    },
    /// The fill value cannot be represented by the pixel type; the output is
    /// zero-filled and reports a nodata of zero.
    FillOutOfRange { value: f64, dtype: &'static str },
    /// A source outside the output extent was skipped.
    SourceSkipped { index: usize },
}

impl std::fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodataMismatch { values, chosen } => write!(
                f,
                "sources disagree on nodata ({:?}); using {:?}. Supply an explicit nodata value for better results",
                values, chosen
            ),
            Self::FillOutOfRange { value, dtype } => write!(
                f,
                "nodata value {} is beyond the valid range of {}. Supply an explicit nodata value for better results",
                value, dtype
            ),
            Self::SourceSkipped { index } => {
                write!(f, "source {} lies outside the output bounds and was skipped", index)
            }
        }
    }
}

/// The composited output of a merge.
#[derive(Debug, Clone)]
pub struct Mosaic<T> {
    /// Pixel data shaped `(bands, rows, cols)`.
    pub data: Array3<T>,
    /// Transform of the output grid.
    pub transform: Affine,
    /// Fill value used for pixels no source wrote, if any.
    ///
    /// Always matches the pixels actually written: a requested fill the pixel
    /// type cannot hold is reported as `0.0`.
    pub nodata: Option<f64>,
    /// Non-fatal conditions raised while merging.
    pub warnings: Vec<MergeWarning>,
}

impl<T> Mosaic<T> {
    /// `(bands, rows, cols)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Georeferenced extent of the output grid.
    pub fn bounds(&self) -> Bounds {
        let (_, rows, cols) = self.data.dim();
        array_bounds(rows, cols, &self.transform)
    }

    /// Split into the output array and its transform.
    pub fn into_parts(self) -> (Array3<T>, Affine) {
        (self.data, self.transform)
    }
}
