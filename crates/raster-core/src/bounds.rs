//! Georeferenced bounding rectangles.

use serde::{Deserialize, Serialize};

/// A rectangle in georeferenced coordinates, `(left, bottom, right, top)`.
///
/// Non-degenerate extents satisfy `left < right` and `bottom < top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    /// Create new bounds from edge coordinates.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Smallest bounds enclosing every point in `points`.
    ///
    /// Returns NaN edges when `points` is empty.
    pub fn enclosing(points: &[(f64, f64)]) -> Self {
        let mut bounds = Self::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        for &(x, y) in points {
            bounds.left = bounds.left.min(x);
            bounds.right = bounds.right.max(x);
            bounds.bottom = bounds.bottom.min(y);
            bounds.top = bounds.top.max(y);
        }
        bounds
    }

    /// Width in coordinate units.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height in coordinate units.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True if the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.bottom < self.top)
    }

    /// Check if this rectangle shares a region of positive area with another.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    /// Compute the intersection of two rectangles.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }

        Some(Bounds {
            left: self.left.max(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.min(other.right),
            top: self.top.min(other.top),
        })
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Smallest rectangle covering every item, or `None` for an empty iterator.
    pub fn union_all<'a, I>(bounds: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a Bounds>,
    {
        bounds.into_iter().fold(None, |acc, b| match acc {
            None => Some(*b),
            Some(u) => Some(u.union(b)),
        })
    }

    /// Check if a point is contained within this rectangle (edges included).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }

    /// Check if this rectangle fully covers another.
    pub fn covers(&self, other: &Bounds) -> bool {
        self.left <= other.left
            && self.bottom <= other.bottom
            && self.right >= other.right
            && self.top >= other.top
    }

    /// Grow every edge outward by `buffer` coordinate units.
    pub fn expand(&self, buffer: f64) -> Self {
        Self {
            left: self.left - buffer,
            bottom: self.bottom - buffer,
            right: self.right + buffer,
            top: self.top + buffer,
        }
    }
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from((left, bottom, right, top): (f64, f64, f64, f64)) -> Self {
        Self::new(left, bottom, right, top)
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.bottom, self.right, self.top
        )
    }
}
