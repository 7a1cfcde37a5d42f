//! Area, perimeter, and centroid of a dense contour.
//!
//! The contour is read as an implicitly closed polygon. Self-intersections
//! from noisy input are measured as-is; nothing is repaired.

use geo::{Area, Centroid};
use serde::{Deserialize, Serialize};

use crate::spline::DenseContour;
use crate::types::{Point, to_polygon};

/// Size and position of a closed contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonMetrics {
    /// Enclosed area in physical units (mm²).
    pub area: f64,
    /// Boundary length in physical units (mm), closing edge included.
    pub perimeter: f64,
    /// Area-weighted centroid in pixel coordinates.
    pub centroid: Point,
}

/// Measure `contour`, scaling lengths by `resolution` (mm per pixel).
#[must_use]
pub fn measure(contour: &DenseContour, resolution: f64) -> PolygonMetrics {
    measure_points(contour.points(), resolution)
}

pub(crate) fn measure_points(points: &[Point], resolution: f64) -> PolygonMetrics {
    let polygon = to_polygon(points);
    let area = polygon.unsigned_area() * resolution * resolution;
    let centroid = polygon.centroid().map_or(Point::ORIGIN, Point::from);
    PolygonMetrics {
        area,
        perimeter: ring_length(points) * resolution,
        centroid,
    }
}

/// Sum of consecutive edge lengths including the edge back to the start.
fn ring_length(points: &[Point]) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    match (points.first(), points.last()) {
        (Some(&first), Some(&last)) => open + last.distance(first),
        _ => 0.0,
    }
}
