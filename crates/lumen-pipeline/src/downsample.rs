//! Contour downsampling to a small set of editable knot points.
//!
//! Traced boundaries carry one vertex per boundary pixel step, far more
//! than a person can drag around. Fixed-stride sampling keeps every
//! `⌊len / K⌋`-th vertex starting at index 0, which preserves the
//! boundary's orientation and start point.

use crate::knots::KnotContour;
use crate::types::Polyline;

/// Pick at most `knot_count` vertices from `boundary` at a fixed stride.
///
/// Exactly `knot_count` points are returned whenever the boundary has at
/// least that many vertices. Shorter boundaries are returned unchanged.
#[must_use]
pub fn downsample(boundary: &Polyline, knot_count: usize) -> KnotContour {
    let points = boundary.points();
    if knot_count == 0 {
        return KnotContour::new(Vec::new());
    }
    if points.len() < knot_count {
        return KnotContour::new(points.to_vec());
    }

    let stride = points.len() / knot_count;
    KnotContour::new(
        points
            .iter()
            .step_by(stride)
            .take(knot_count)
            .copied()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[allow(clippy::cast_precision_loss)]
    fn line(n: usize) -> Polyline {
        Polyline::new((0..n).map(|i| Point::new(i as f64, 0.0)).collect())
    }

    #[test]
    fn empty_boundary_gives_empty_knots() {
        assert!(downsample(&line(0), 20).is_empty());
    }

    #[test]
    fn short_boundary_returned_unchanged() {
        let knots = downsample(&line(7), 20);
        assert_eq!(knots.points(), line(7).points());
    }

    #[test]
    fn exact_multiple_uses_full_stride() {
        let knots = downsample(&line(100), 20);
        assert_eq!(knots.len(), 20);
        assert_eq!(knots.points()[0], Point::new(0.0, 0.0));
        assert_eq!(knots.points()[1], Point::new(5.0, 0.0));
        assert_eq!(knots.points()[19], Point::new(95.0, 0.0));
    }

    #[test]
    fn remainder_never_exceeds_target() {
        // 39 / 20 floors to a stride of 1; only the first 20 are kept.
        let knots = downsample(&line(39), 20);
        assert_eq!(knots.len(), 20);
        assert_eq!(knots.points()[19], Point::new(19.0, 0.0));
    }

    #[test]
    fn count_is_bounded_for_all_lengths() {
        for n in 0..200 {
            let knots = downsample(&line(n), 20);
            if n >= 20 {
                assert_eq!(knots.len(), 20, "n = {n}");
            } else {
                assert_eq!(knots.len(), n, "n = {n}");
            }
        }
    }

    #[test]
    fn zero_target_gives_empty_knots() {
        assert!(downsample(&line(50), 0).is_empty());
    }
}
