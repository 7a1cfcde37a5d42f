//! Displacement of the lumen centroid from the image center.
//!
//! The image center approximates the catheter position, so this vector
//! measures how eccentrically the catheter sits in the vessel.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Length and direction of the centroid offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentroidVector {
    /// Offset length in physical units (mm).
    pub length: f64,
    /// Angle in degrees, in `[0, 360)`, measured from the `(0, 1)`
    /// reference direction.
    pub angle: f64,
}

/// Reference direction the angle is measured from.
const REFERENCE: Point = Point::new(0.0, 1.0);

/// Vector from `center` to `centroid`, length scaled by `resolution`.
///
/// The angle is `atan2(cross, dot)` between [`REFERENCE`] and the offset,
/// converted to degrees with negative results shifted up by 360.
#[must_use]
pub fn centroid_vector(centroid: Point, center: Point, resolution: f64) -> CentroidVector {
    let dx = centroid.x - center.x;
    let dy = centroid.y - center.y;

    let dot = REFERENCE.x.mul_add(dx, REFERENCE.y * dy);
    let cross = REFERENCE.x.mul_add(dy, -(REFERENCE.y * dx));
    let mut angle = cross.atan2(dot).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    // A tiny negative angle rounds up to exactly 360.
    if angle >= 360.0 {
        angle = 0.0;
    }

    CentroidVector {
        length: dx.hypot(dy) * resolution,
        angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Point = Point::new(50.0, 50.0);

    fn angle_of(dx: f64, dy: f64) -> f64 {
        centroid_vector(Point::new(50.0 + dx, 50.0 + dy), CENTER, 1.0).angle
    }

    #[test]
    fn length_is_scaled() {
        let v = centroid_vector(Point::new(53.0, 54.0), CENTER, 0.02);
        assert!((v.length - 0.1).abs() < 1e-12);
    }

    #[test]
    fn along_reference_is_zero_degrees() {
        assert!(angle_of(0.0, 2.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_turns() {
        // cross = -dx, so +x lies at 270° and -x at 90°.
        assert!((angle_of(-3.0, 0.0) - 90.0).abs() < 1e-12);
        assert!((angle_of(0.0, -3.0) - 180.0).abs() < 1e-12);
        assert!((angle_of(3.0, 0.0) - 270.0).abs() < 1e-12);
    }

    #[test]
    fn angle_is_always_in_range() {
        for step in 0..72 {
            let a = f64::from(step) * 5.0_f64.to_radians();
            let angle = angle_of(a.cos(), a.sin());
            assert!((0.0..360.0).contains(&angle), "angle {angle}");
        }
    }

    #[test]
    fn tiny_negative_angle_wraps_to_zero() {
        let v = centroid_vector(Point::new(50.000_000_000_000_014, 1e6), CENTER, 1.0);
        assert!((0.0..360.0).contains(&v.angle), "angle {}", v.angle);
    }

    #[test]
    fn centered_centroid_has_zero_length() {
        let v = centroid_vector(CENTER, CENTER, 0.5);
        assert!(v.length.abs() < f64::EPSILON);
        assert!((0.0..360.0).contains(&v.angle));
    }
}
