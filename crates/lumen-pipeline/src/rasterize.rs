//! Closed contour to binary mask.
//!
//! The inverse of contour extraction: pixel `(x, y)` is foreground when
//! the point `(x, y)` (its center, in the same coordinates the tracer
//! emits) lies strictly inside the polygon.

use geo::{BoundingRect, Contains};

use crate::types::{Dimensions, Mask, Point, to_polygon};

/// Rasterize the implicitly closed polygon `points` into a mask of
/// `dimensions`. Fewer than three points give an empty mask.
#[must_use]
pub fn rasterize(points: &[Point], dimensions: Dimensions) -> Mask {
    let Dimensions { width, height } = dimensions;
    if points.len() < 3 {
        return Mask::empty(width, height);
    }

    let polygon = to_polygon(points);
    let Some(bounds) = polygon.bounding_rect() else {
        return Mask::empty(width, height);
    };
    let (min, max) = (bounds.min(), bounds.max());

    Mask::from_fn(width, height, |x, y| {
        let (px, py) = (f64::from(x), f64::from(y));
        px >= min.x
            && px <= max.x
            && py >= min.y
            && py <= max.y
            && polygon.contains(&geo::Point::new(px, py))
    })
}
