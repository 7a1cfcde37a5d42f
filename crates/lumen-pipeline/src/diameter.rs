//! Extremal diameters of a dense contour.
//!
//! The longest distance is a true all-pairs maximum. The shortest
//! distance is **not** a geometric minimum width: point `i` is paired
//! only with point `i + N/2` for `i < N/2`, and the smallest of those
//! `N/2` distances is reported. For the near-elliptical contours a spline
//! fit produces, index order tracks angle around the shape, so these are
//! roughly antipodal pairs. Previously computed reports depend on this
//! exact pairing; highly non-convex shapes give unspecified widths.

use serde::{Deserialize, Serialize};

use crate::spline::DenseContour;
use crate::types::{GeometryError, Point};

/// A distance and the pair of contour points that realize it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diameter {
    /// Distance in physical units (mm).
    pub distance: f64,
    /// The two contour points, in pixel coordinates.
    pub endpoints: (Point, Point),
}

impl Diameter {
    /// Fallback for a failed width search: zero distance at the origin.
    pub const ZERO: Self = Self {
        distance: 0.0,
        endpoints: (Point::ORIGIN, Point::ORIGIN),
    };
}

/// Longest diameter, shortest antipodal width, and their ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diameters {
    /// Largest distance between any two contour points.
    pub longest: Diameter,
    /// Smallest distance among index-antipodal pairs.
    pub shortest: Diameter,
}

impl Diameters {
    /// `longest / shortest`, or `None` when the width is zero.
    #[must_use]
    pub fn elliptic_ratio(&self) -> Option<f64> {
        (self.shortest.distance != 0.0).then(|| self.longest.distance / self.shortest.distance)
    }
}

/// Measure both diameters of `contour`, scaled by `resolution`.
///
/// A failed width search is logged and replaced by [`Diameter::ZERO`];
/// a contour too small for any pair uses the same fallback for its
/// longest diameter.
#[must_use]
pub fn analyze(contour: &DenseContour, resolution: f64) -> Diameters {
    analyze_points(contour.points(), resolution)
}

pub(crate) fn analyze_points(points: &[Point], resolution: f64) -> Diameters {
    let longest = longest_distance(points, resolution).unwrap_or(Diameter::ZERO);
    let shortest = shortest_distance(points, resolution).unwrap_or_else(|err| {
        tracing::warn!(points = points.len(), "{err}, width falls back to zero");
        Diameter::ZERO
    });
    Diameters { longest, shortest }
}

/// Exhaustive maximum over all unordered pairs `i < j`.
///
/// The first pair in index order wins ties. Returns `None` for fewer
/// than two points.
#[must_use]
pub fn longest_distance(points: &[Point], resolution: f64) -> Option<Diameter> {
    let mut best: Option<(f64, usize, usize)> = None;
    for (i, &a) in points.iter().enumerate() {
        for (j, &b) in points.iter().enumerate().skip(i + 1) {
            let d = a.distance_squared(b);
            if best.is_none_or(|(max, _, _)| d > max) {
                best = Some((d, i, j));
            }
        }
    }
    best.map(|(d, i, j)| Diameter {
        distance: d.sqrt() * resolution,
        endpoints: (points[i], points[j]),
    })
}

/// Minimum over the index pairs `(i, i + N/2)` for `i` in `0..N/2`.
///
/// The first pair wins ties.
///
/// # Errors
///
/// Returns [`GeometryError::DegeneratePolygon`] if there is no pair or
/// no pair has a finite distance.
pub fn shortest_distance(points: &[Point], resolution: f64) -> Result<Diameter, GeometryError> {
    let half = points.len() / 2;
    let mut best: Option<(f64, usize)> = None;
    for i in 0..half {
        let d = points[i].distance(points[i + half]);
        if d < best.map_or(f64::INFINITY, |(min, _)| min) {
            best = Some((d, i));
        }
    }
    best.map(|(d, i)| Diameter {
        distance: d * resolution,
        endpoints: (points[i], points[i + half]),
    })
    .ok_or(GeometryError::DegeneratePolygon)
}
