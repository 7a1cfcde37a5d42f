//! Periodic interpolating cubic spline through knot points.
//!
//! [`fit`] is the one derivation from a [`KnotContour`] to a
//! [`DenseContour`]. The curve passes through every knot, is C² everywhere
//! including across the seam between the last and first knot, and is
//! parametrized by cumulative chord length. It is sampled at uniform
//! parameter steps over the closed domain `[0, T]`, so the first and last
//! dense points coincide.
//!
//! Edits never patch a dense contour: any knot change is followed by a
//! fresh [`fit`] over all knots, which is O(K) in the knot count.

use serde::Serialize;

use crate::knots::KnotContour;
use crate::types::{AnalysisConfig, GeometryError, Point};

/// Fewest distinct knots a periodic cubic fit accepts.
pub const MIN_KNOTS: usize = 4;

/// Pivot magnitude below which the spline system is treated as singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// A fixed-size closed curve sampled from a spline fit.
///
/// There is no public constructor: a dense contour only comes out of
/// [`fit`], so it can never drift from the knots it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseContour(Vec<Point>);

impl DenseContour {
    /// All sampled points in parameter order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of sampled points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// X coordinates in order.
    #[must_use]
    pub fn xs(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.x).collect()
    }

    /// Y coordinates in order.
    #[must_use]
    pub fn ys(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.y).collect()
    }

    /// Distance between the first and last sample.
    #[must_use]
    pub fn closure_gap(&self) -> f64 {
        match (self.0.first(), self.0.last()) {
            (Some(&a), Some(&b)) => a.distance(b),
            _ => 0.0,
        }
    }
}

/// Fit a periodic cubic spline through `knots` and sample it at
/// `samples` uniformly spaced parameter values.
///
/// A final knot equal to the first is treated as an explicit closing
/// point and ignored.
///
/// # Errors
///
/// Returns [`GeometryError::InsufficientPoints`] if there are fewer than
/// [`MIN_KNOTS`] knots, two consecutive knots coincide, a coordinate is
/// not finite, or the spline system is singular, and
/// [`GeometryError::InvalidConfig`] if `samples` is below
/// [`AnalysisConfig::MIN_DENSE_POINTS`].
pub fn fit(knots: &KnotContour, samples: usize) -> Result<DenseContour, GeometryError> {
    if samples < AnalysisConfig::MIN_DENSE_POINTS {
        return Err(GeometryError::InvalidConfig(format!(
            "cannot sample a closed curve at {samples} points"
        )));
    }
    let spline = PeriodicSpline::new(knots.points())?;
    Ok(DenseContour(spline.sample(samples)))
}

/// Closed interpolating cubic with second-derivative coefficients per knot.
#[derive(Debug, Clone)]
struct PeriodicSpline {
    knots: Vec<Point>,
    /// Parameter value at each knot; `params[0] == 0`.
    params: Vec<f64>,
    /// Chord length from knot `i` to knot `i + 1` (wrapping).
    chords: Vec<f64>,
    /// Total parameter length, including the closing chord.
    period: f64,
    second_x: Vec<f64>,
    second_y: Vec<f64>,
}

impl PeriodicSpline {
    fn new(points: &[Point]) -> Result<Self, GeometryError> {
        let points = match points {
            [first, .., last] if first == last => &points[..points.len() - 1],
            _ => points,
        };
        let n = points.len();

        if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
            tracing::warn!(knot = bad, "non-finite knot coordinate, skipping curve fit");
            return Err(GeometryError::InsufficientPoints {
                found: points.iter().filter(|p| p.is_finite()).count(),
                required: MIN_KNOTS,
            });
        }

        let chords: Vec<f64> = (0..n)
            .map(|i| points[i].distance(points[(i + 1) % n]))
            .collect();
        let distinct = chords.iter().filter(|&&h| h > 0.0).count().max(usize::from(n > 0));
        if n < MIN_KNOTS || chords.iter().any(|&h| h <= 0.0) {
            return Err(GeometryError::InsufficientPoints {
                found: distinct,
                required: MIN_KNOTS,
            });
        }

        let mut params = Vec::with_capacity(n);
        let mut acc = 0.0;
        for &h in &chords {
            params.push(acc);
            acc += h;
        }
        let period = acc;

        let singular = || {
            tracing::warn!(knots = n, "singular spline system, skipping curve fit");
            GeometryError::InsufficientPoints {
                found: n,
                required: MIN_KNOTS,
            }
        };
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let second_x = solve_second_derivatives(&chords, &xs).ok_or_else(singular)?;
        let second_y = solve_second_derivatives(&chords, &ys).ok_or_else(singular)?;

        Ok(Self {
            knots: points.to_vec(),
            params,
            chords,
            period,
            second_x,
            second_y,
        })
    }

    /// Evaluate the curve at parameter `t` in `[0, period]`.
    fn at(&self, t: f64) -> Point {
        let n = self.knots.len();
        let i = self
            .params
            .partition_point(|&p| p <= t)
            .saturating_sub(1)
            .min(n - 1);
        let j = (i + 1) % n;
        let h = self.chords[i];
        let s0 = t - self.params[i];
        let s1 = h - s0;

        let eval = |c0: f64, c1: f64, m0: f64, m1: f64| {
            let cubic = m0.mul_add(s1.powi(3), m1 * s0.powi(3)) / (6.0 * h);
            let linear = (c0 / h - m0 * h / 6.0).mul_add(s1, (c1 / h - m1 * h / 6.0) * s0);
            cubic + linear
        };

        Point::new(
            eval(
                self.knots[i].x,
                self.knots[j].x,
                self.second_x[i],
                self.second_x[j],
            ),
            eval(
                self.knots[i].y,
                self.knots[j].y,
                self.second_y[i],
                self.second_y[j],
            ),
        )
    }

    /// Sample `count` points at uniform parameter steps over `[0, period]`.
    fn sample(&self, count: usize) -> Vec<Point> {
        #[allow(clippy::cast_precision_loss)]
        let last = (count - 1) as f64;
        (0..count)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let t = self.period * (k as f64 / last);
                self.at(t)
            })
            .collect()
    }
}

/// Second derivatives of the periodic cubic through `values` with
/// knot spacings `chords`.
///
/// Row `i` of the system is
/// `h[i-1]·M[i-1] + 2(h[i-1] + h[i])·M[i] + h[i]·M[i+1] = 6(Δ[i] − Δ[i-1])`
/// with `Δ[i] = (v[i+1] − v[i]) / h[i]`, indices wrapping.
fn solve_second_derivatives(chords: &[f64], values: &[f64]) -> Option<Vec<f64>> {
    let n = chords.len();
    let prev = |i: usize| (i + n - 1) % n;
    let slope = |i: usize| (values[(i + 1) % n] - values[i]) / chords[i];

    let sub: Vec<f64> = (0..n).map(|i| chords[prev(i)]).collect();
    let diag: Vec<f64> = (0..n).map(|i| 2.0 * (chords[prev(i)] + chords[i])).collect();
    let sup: Vec<f64> = chords.to_vec();
    let rhs: Vec<f64> = (0..n).map(|i| 6.0 * (slope(i) - slope(prev(i)))).collect();

    // Both off-diagonal corners hold the closing chord.
    let corner = chords[n - 1];
    solve_cyclic(&sub, &diag, &sup, corner, corner, &rhs)
}

/// Solve a cyclic tridiagonal system by Sherman-Morrison on top of the
/// Thomas algorithm.
///
/// `sub[i]` and `sup[i]` are the entries left and right of `diag[i]`;
/// `sub[0]` and `sup[n-1]` are unused. `bottom_left` sits at `(n-1, 0)`
/// and `top_right` at `(0, n-1)`. Returns `None` on a vanishing pivot.
fn solve_cyclic(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    bottom_left: f64,
    top_right: f64,
    rhs: &[f64],
) -> Option<Vec<f64>> {
    let n = diag.len();
    if n < 3 {
        return None;
    }

    let gamma = -diag[0];
    let mut modified = diag.to_vec();
    modified[0] = diag[0] - gamma;
    modified[n - 1] = diag[n - 1] - bottom_left * top_right / gamma;

    let mut x = solve_tridiagonal(sub, &modified, sup, rhs)?;

    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = bottom_left;
    let z = solve_tridiagonal(sub, &modified, sup, &u)?;

    let denom = 1.0 + z[0] + top_right * z[n - 1] / gamma;
    if !denom.is_finite() || denom.abs() < PIVOT_EPSILON {
        return None;
    }
    let factor = (x[0] + top_right * x[n - 1] / gamma) / denom;
    for (xi, zi) in x.iter_mut().zip(&z) {
        *xi -= factor * zi;
    }
    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Thomas algorithm for a plain tridiagonal system.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Option<Vec<f64>> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    for i in 0..n {
        let (c_prev, d_prev) = if i == 0 { (0.0, 0.0) } else { (c[i - 1], d[i - 1]) };
        let a = if i == 0 { 0.0 } else { sub[i] };
        let pivot = a.mul_add(-c_prev, diag[i]);
        if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON {
            return None;
        }
        c[i] = if i + 1 < n { sup[i] / pivot } else { 0.0 };
        d[i] = a.mul_add(-d_prev, rhs[i]) / pivot;
    }

    let mut x = d;
    for i in (0..n.saturating_sub(1)).rev() {
        x[i] = c[i].mul_add(-x[i + 1], x[i]);
    }
    Some(x)
}
