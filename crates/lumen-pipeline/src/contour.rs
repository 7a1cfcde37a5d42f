//! Contour tracing: extract the lumen boundary from a binary mask.
//!
//! This module defines the [`ContourTracer`] trait for pluggable contour
//! tracing algorithms and the [`ContourTracerKind`] enum for selecting
//! which algorithm to use at runtime. [`extract_lumen`] runs a tracer and
//! selects the single boundary that represents the lumen.
//!
//! # Selection
//!
//! A traced boundary is a candidate only if its interior contains the
//! mask center (see [`Mask::center`]). Among candidates the one with the
//! most vertices wins, which stands in for "largest". Ties keep the first
//! boundary in tracing order, so identical masks always give identical
//! output.

use std::collections::{HashMap, HashSet};

use geo::Contains;
use serde::{Deserialize, Serialize};

use crate::types::{GeometryError, Mask, Point, Polyline};

/// Selects which contour tracing algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContourTracerKind {
    /// Iso-contour at the 0.5 level between pixel centers.
    ///
    /// Vertices sit on the midpoints of pixel-center edges, so the
    /// boundary runs half a pixel outside the foreground centers. The
    /// raster is treated as surrounded by background so every boundary
    /// closes, even where the foreground touches the image border.
    #[default]
    MarchingSquares,

    /// Suzuki-Abe border following via `imageproc::contours::find_contours`.
    ///
    /// Vertices are the boundary pixels themselves (integer coordinates).
    BorderFollowing,
}

/// Trait for contour tracing strategies.
///
/// Input: a binary mask. Output: every closed boundary between
/// foreground and background, each as an implicitly closed ring.
pub trait ContourTracer {
    /// Trace all closed boundaries in the given mask.
    fn trace(&self, mask: &Mask) -> Vec<Polyline>;
}

impl ContourTracer for ContourTracerKind {
    fn trace(&self, mask: &Mask) -> Vec<Polyline> {
        match *self {
            Self::MarchingSquares => trace_marching_squares(mask),
            Self::BorderFollowing => trace_border_following(mask),
        }
    }
}

/// Trace `mask` and keep the boundary that encloses the mask center.
///
/// # Errors
///
/// Returns [`GeometryError::NoContourFound`] if the mask has no
/// foreground or no traced boundary contains the center.
pub fn extract_lumen(mask: &Mask, tracer: &impl ContourTracer) -> Result<Polyline, GeometryError> {
    if mask.is_empty() {
        return Err(GeometryError::NoContourFound);
    }
    let center = mask.center();
    select_lumen(tracer.trace(mask), center).ok_or(GeometryError::NoContourFound)
}

/// Keep the boundary with the most vertices among those containing `center`.
fn select_lumen(contours: Vec<Polyline>, center: Point) -> Option<Polyline> {
    let probe = geo::Point::new(center.x, center.y);
    let mut best: Option<Polyline> = None;
    for contour in contours {
        if contour.len() < 3 || !contour.to_polygon().contains(&probe) {
            continue;
        }
        if best.as_ref().is_none_or(|b| contour.len() > b.len()) {
            best = Some(contour);
        }
    }
    best
}

/// Suzuki-Abe border following via `imageproc::contours::find_contours`.
///
/// Converts `imageproc` contour points (integer grid coordinates) into
/// floating-point [`Point`]s.
fn trace_border_following(mask: &Mask) -> Vec<Polyline> {
    let contours: Vec<imageproc::contours::Contour<u32>> =
        imageproc::contours::find_contours(mask.as_gray());

    contours
        .into_iter()
        .filter(|c| c.points.len() >= 3)
        .map(|c| {
            let points = c
                .points
                .into_iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect();
            Polyline::new(points)
        })
        .collect()
}

// ───────────────────────── Marching squares ─────────────────────────

/// A crossing vertex in doubled coordinates, so every edge midpoint is
/// an integer pair: `(2x, 2y)`.
type Vertex = (i64, i64);

/// Cell edge on which a crossing lies.
#[derive(Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Doubled coordinates of this edge's midpoint for the cell whose
    /// top-left pixel is `(i, j)`.
    const fn midpoint(self, i: i64, j: i64) -> Vertex {
        match self {
            Self::Top => (2 * i + 1, 2 * j),
            Self::Right => (2 * i + 2, 2 * j + 1),
            Self::Bottom => (2 * i + 1, 2 * j + 2),
            Self::Left => (2 * i, 2 * j + 1),
        }
    }
}

/// Oriented boundary segments for a cell case.
///
/// Case bits: top-left = 1, top-right = 2, bottom-right = 4,
/// bottom-left = 8. Every segment keeps the foreground on its left in
/// image coordinates (x right, y down), so each vertex starts at most
/// one segment and loops can be followed without search. Saddles (5 and
/// 10) keep the diagonal foreground pixels apart.
const fn cell_segments(case: u8) -> &'static [(Edge, Edge)] {
    use Edge::{Bottom, Left, Right, Top};
    match case {
        1 => &[(Left, Top)],
        2 => &[(Top, Right)],
        3 => &[(Left, Right)],
        4 => &[(Right, Bottom)],
        5 => &[(Left, Top), (Right, Bottom)],
        6 => &[(Top, Bottom)],
        7 => &[(Left, Bottom)],
        8 => &[(Bottom, Left)],
        9 => &[(Bottom, Top)],
        10 => &[(Top, Right), (Bottom, Left)],
        11 => &[(Bottom, Right)],
        12 => &[(Right, Left)],
        13 => &[(Right, Top)],
        14 => &[(Top, Left)],
        _ => &[],
    }
}

/// Marching squares at the 0.5 iso-level.
///
/// Cells are visited in raster order, starting one pixel outside the
/// raster on every side. Loops are emitted in the order their first
/// segment is encountered.
fn trace_marching_squares(mask: &Mask) -> Vec<Polyline> {
    let width = i64::from(mask.width());
    let height = i64::from(mask.height());

    let mut starts: Vec<Vertex> = Vec::new();
    let mut next: HashMap<Vertex, Vertex> = HashMap::new();

    for j in -1..height {
        for i in -1..width {
            let case = u8::from(mask.is_foreground(i, j))
                | (u8::from(mask.is_foreground(i + 1, j)) << 1)
                | (u8::from(mask.is_foreground(i + 1, j + 1)) << 2)
                | (u8::from(mask.is_foreground(i, j + 1)) << 3);
            for &(from, to) in cell_segments(case) {
                let a = from.midpoint(i, j);
                next.insert(a, to.midpoint(i, j));
                starts.push(a);
            }
        }
    }

    let mut visited: HashSet<Vertex> = HashSet::with_capacity(starts.len());
    let mut contours = Vec::new();

    for start in starts {
        if visited.contains(&start) {
            continue;
        }
        let mut ring = Vec::new();
        let mut current = start;
        // Orientation guarantees a single successor per vertex, so the
        // walk returns to `start` unless the segment table is inconsistent.
        while visited.insert(current) {
            #[allow(clippy::cast_precision_loss)]
            ring.push(Point::new(current.0 as f64 / 2.0, current.1 as f64 / 2.0));
            match next.get(&current) {
                Some(&n) => current = n,
                None => break,
            }
        }
        if ring.len() >= 3 {
            contours.push(Polyline::new(ring));
        }
    }

    contours
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use geo::Area;

    fn square_mask() -> Mask {
        // 10x10 foreground square centered in a 20x20 frame.
        Mask::from_fn(20, 20, |x, y| (5..15).contains(&x) && (5..15).contains(&y))
    }

    #[test]
    fn default_is_marching_squares() {
        assert_eq!(
            ContourTracerKind::default(),
            ContourTracerKind::MarchingSquares
        );
    }

    #[test]
    fn empty_mask_produces_no_contours() {
        let mask = Mask::empty(10, 10);
        assert!(ContourTracerKind::MarchingSquares.trace(&mask).is_empty());
        assert!(ContourTracerKind::BorderFollowing.trace(&mask).is_empty());
    }

    #[test]
    fn single_pixel_is_a_diamond() {
        let mask = Mask::from_fn(5, 5, |x, y| x == 2 && y == 2);
        let contours = ContourTracerKind::MarchingSquares.trace(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        let area = contours[0].to_polygon().unsigned_area();
        assert!((area - 0.5).abs() < 1e-12, "area = {area}");
    }

    #[test]
    fn square_boundary_lies_half_a_pixel_out() {
        let contours = ContourTracerKind::MarchingSquares.trace(&square_mask());
        assert_eq!(contours.len(), 1);
        let ring = &contours[0];
        for p in ring.points() {
            assert!(p.x >= 4.5 && p.x <= 14.5, "x out of range: {p:?}");
            assert!(p.y >= 4.5 && p.y <= 14.5, "y out of range: {p:?}");
        }
        // Corners are cut by the iso-line: 10x10 minus four half-pixel
        // triangles of area 1/8 each.
        let area = ring.to_polygon().unsigned_area();
        assert!((area - 99.5).abs() < 1e-9, "area = {area}");
    }

    #[test]
    fn rings_are_closed_and_unit_stepped() {
        let contours = ContourTracerKind::MarchingSquares.trace(&square_mask());
        let pts = contours[0].points();
        // Straight runs step one pixel, cut corners step half a diagonal.
        for w in pts.windows(2) {
            let d = w[0].distance(w[1]);
            assert!(d > 0.0 && d <= 1.0 + 1e-12, "step {d}");
        }
        let closing = pts[pts.len() - 1].distance(pts[0]);
        assert!(closing > 0.0 && closing <= 1.0 + 1e-12);
    }

    #[test]
    fn foreground_touching_border_still_closes() {
        let mask = Mask::from_fn(6, 6, |_, _| true);
        let contours = ContourTracerKind::MarchingSquares.trace(&mask);
        assert_eq!(contours.len(), 1);
        let area = contours[0].to_polygon().unsigned_area();
        assert!((area - 35.5).abs() < 1e-9, "area = {area}");
    }

    #[test]
    fn saddle_keeps_diagonal_pixels_apart() {
        // Two pixels touching only at a corner.
        let mask = Mask::from_fn(4, 4, |x, y| (x, y) == (1, 1) || (x, y) == (2, 2));
        let contours = ContourTracerKind::MarchingSquares.trace(&mask);
        assert_eq!(contours.len(), 2);
        for c in &contours {
            assert_eq!(c.len(), 4);
        }
    }

    #[test]
    fn annulus_produces_outer_and_inner_rings() {
        let mask = Mask::from_fn(30, 30, |x, y| {
            let d = (f64::from(x) - 15.0).hypot(f64::from(y) - 15.0);
            (5.0..=10.0).contains(&d)
        });
        let contours = ContourTracerKind::MarchingSquares.trace(&mask);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn border_following_finds_square() {
        let contours = ContourTracerKind::BorderFollowing.trace(&square_mask());
        assert!(!contours.is_empty());
        for polyline in &contours {
            assert!(polyline.len() >= 4);
        }
    }

    #[test]
    fn extract_empty_mask_is_no_contour() {
        let result = extract_lumen(&Mask::empty(16, 16), &ContourTracerKind::default());
        assert_eq!(result, Err(GeometryError::NoContourFound));
    }

    #[test]
    fn extract_rejects_blob_away_from_center() {
        let mask = Mask::from_fn(20, 20, |x, y| x < 4 && y < 4);
        let result = extract_lumen(&mask, &ContourTracerKind::default());
        assert_eq!(result, Err(GeometryError::NoContourFound));
    }

    #[test]
    fn extract_keeps_centered_blob_over_larger_offcenter_blob() {
        let mask = Mask::from_fn(40, 40, |x, y| {
            let centered = (17..24).contains(&x) && (17..24).contains(&y);
            let corner = x < 14 && y < 14;
            centered || corner
        });
        for tracer in [
            ContourTracerKind::MarchingSquares,
            ContourTracerKind::BorderFollowing,
        ] {
            let lumen = extract_lumen(&mask, &tracer).unwrap();
            for p in lumen.points() {
                assert!(p.x > 15.0 && p.y > 15.0, "{tracer:?} kept {p:?}");
            }
        }
    }

    #[test]
    fn extract_prefers_outer_ring_of_annulus() {
        let mask = Mask::from_fn(40, 40, |x, y| {
            let d = (f64::from(x) - 20.0).hypot(f64::from(y) - 20.0);
            (4.0..=12.0).contains(&d)
        });
        let lumen = extract_lumen(&mask, &ContourTracerKind::MarchingSquares).unwrap();
        let far = lumen
            .points()
            .iter()
            .map(|p| p.distance(Point::new(20.0, 20.0)))
            .fold(0.0, f64::max);
        assert!(far > 11.0, "expected outer ring, max radius {far}");
    }

    #[test]
    fn extraction_is_deterministic() {
        let mask = Mask::from_fn(32, 32, |x, y| {
            let dx = f64::from(x) - 16.0;
            let dy = f64::from(y) - 15.0;
            (dx / 11.0).powi(2) + (dy / 7.0).powi(2) <= 1.0
        });
        let a = extract_lumen(&mask, &ContourTracerKind::MarchingSquares).unwrap();
        let b = extract_lumen(&mask.clone(), &ContourTracerKind::MarchingSquares).unwrap();
        assert_eq!(a, b);
    }
}
