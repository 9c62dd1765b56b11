//! Affine georeferencing transforms.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::error::{RasterError, RasterResult};

/// A 6-coefficient affine transform mapping pixel `(col, row)` to `(x, y)`:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// For north-up rasters `b` and `d` are zero and `e` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    /// Create a transform from its coefficients, in `(a, b, c, d, e, f)` order.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// A pure translation by `(x, y)`.
    pub const fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, x, 0.0, 1.0, y)
    }

    /// A pure scaling by `(sx, sy)`.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// Create from a GDAL geotransform `[c, a, b, f, d, e]`.
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self::new(gt[1], gt[2], gt[0], gt[4], gt[5], gt[3])
    }

    /// Convert to a GDAL geotransform `[c, a, b, f, d, e]`.
    pub fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }

    /// Apply the transform to a pixel coordinate, returning `(x, y)`.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// True if the transform cannot be inverted.
    pub fn is_degenerate(&self) -> bool {
        let det = self.determinant();
        det == 0.0 || !det.is_finite()
    }

    /// True if the transform has no rotation or shear terms.
    pub fn is_rectilinear(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    /// The inverse transform, mapping `(x, y)` back to continuous `(col, row)`.
    pub fn inverse(&self) -> RasterResult<Affine> {
        if self.is_degenerate() {
            return Err(RasterError::DegenerateTransform(self.determinant()));
        }

        let idet = 1.0 / self.determinant();
        let ra = self.e * idet;
        let rb = -self.b * idet;
        let rd = -self.d * idet;
        let re = self.a * idet;

        Ok(Affine::new(
            ra,
            rb,
            -self.c * ra - self.f * rb,
            rd,
            re,
            -self.c * rd - self.f * re,
        ))
    }

    /// Pixel size along each axis, `(x_res, y_res)`, always positive.
    pub fn res(&self) -> (f64, f64) {
        (
            (self.a * self.a + self.d * self.d).sqrt(),
            (self.b * self.b + self.e * self.e).sqrt(),
        )
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

/// Composition: `(self * rhs)` applies `rhs` first, then `self`.
impl Mul for Affine {
    type Output = Affine;

    fn mul(self, rhs: Affine) -> Affine {
        Affine::new(
            self.a * rhs.a + self.b * rhs.d,
            self.a * rhs.b + self.b * rhs.e,
            self.a * rhs.c + self.b * rhs.f + self.c,
            self.d * rhs.a + self.e * rhs.d,
            self.d * rhs.b + self.e * rhs.e,
            self.d * rhs.c + self.e * rhs.f + self.f,
        )
    }
}

impl Mul<(f64, f64)> for Affine {
    type Output = (f64, f64);

    fn mul(self, (col, row): (f64, f64)) -> (f64, f64) {
        self.apply(col, row)
    }
}

/// Bounds of an array of `height` x `width` pixels georeferenced by `transform`.
pub fn array_bounds(height: usize, width: usize, transform: &Affine) -> Bounds {
    let (w, h) = (width as f64, height as f64);
    let corners = [
        transform.apply(0.0, 0.0),
        transform.apply(w, 0.0),
        transform.apply(0.0, h),
        transform.apply(w, h),
    ];

    Bounds::enclosing(&corners)
}
