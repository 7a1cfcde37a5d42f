//! Knot contours: the sparse, editable, persisted form of a lumen boundary.
//!
//! A [`KnotContour`] is the only contour representation that is stored or
//! edited. Dense curves are always re-derived from it with
//! [`spline::fit`](crate::spline::fit).
//!
//! [`KnotStore`] is the persisted data contract: a map from anatomical
//! label to a pair of per-frame coordinate lists,
//!
//! ```json
//! { "lumen": [[[x0, x1, ...], [], ...], [[y0, y1, ...], [], ...]] }
//! ```
//!
//! where an empty list marks a frame without a contour. Other top-level
//! entries are carried through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{GeometryError, Point};

/// Ordered, implicitly closed control points of one frame's contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotContour(Vec<Point>);

/// A single interactive change to a knot contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KnotEdit {
    /// Move the knot at `index` to `to`.
    Move {
        /// Knot index.
        index: usize,
        /// New position.
        to: Point,
    },
    /// Add a new final knot.
    Append(Point),
}

impl KnotContour {
    /// Create a knot contour from points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Pair up separate coordinate lists.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedStore`] if the lists differ in
    /// length.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Self, GeometryError> {
        if xs.len() != ys.len() {
            return Err(GeometryError::MalformedStore(format!(
                "{} x coordinates but {} y coordinates",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self(
            xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect(),
        ))
    }

    /// Returns `true` if there are no knots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of knots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// All knots in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
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

    /// Apply an edit in place.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::KnotIndexOutOfRange`] if a move addresses
    /// a knot that does not exist. The contour is left unchanged.
    pub fn apply(&mut self, edit: KnotEdit) -> Result<(), GeometryError> {
        match edit {
            KnotEdit::Move { index, to } => {
                let len = self.0.len();
                let knot = self
                    .0
                    .get_mut(index)
                    .ok_or(GeometryError::KnotIndexOutOfRange { index, len })?;
                *knot = to;
            }
            KnotEdit::Append(p) => self.0.push(p),
        }
        Ok(())
    }
}

/// Per-frame x and y coordinate lists for one label.
///
/// Serialized as a two-element array `[xs, ys]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelKnots(pub Vec<Vec<f64>>, pub Vec<Vec<f64>>);

/// Persisted knot contours keyed by anatomical label.
///
/// Contour files also carry per-frame results and annotations next to
/// the labels (`lumen_area`, `phases`, ...). Every top-level entry is kept
/// as raw JSON and written back unchanged; an entry is only parsed as
/// knots when it is read through [`frames`](Self::frames).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnotStore(BTreeMap<String, Value>);

impl KnotStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys whose value has the `[xs, ys]` knot layout, in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, value)| LabelKnots::deserialize(*value).is_ok())
            .map(|(key, _)| key.as_str())
    }

    /// Raw value stored under `key`, label or not.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Store one contour slot per frame under `label`, replacing any
    /// previous entry. Frames without a contour become empty lists.
    pub fn insert(&mut self, label: impl Into<String>, frames: &[Option<KnotContour>]) {
        let (xs, ys): (Vec<Value>, Vec<Value>) = frames
            .iter()
            .map(|frame| {
                frame.as_ref().map_or_else(
                    || (Value::Array(Vec::new()), Value::Array(Vec::new())),
                    |k| (k.xs().into(), k.ys().into()),
                )
            })
            .unzip();
        self.0
            .insert(label.into(), Value::Array(vec![xs.into(), ys.into()]));
    }

    /// Read back one contour slot per frame for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownLabel`] if the label is absent and
    /// [`GeometryError::MalformedStore`] if its value is not an `[xs, ys]`
    /// pair or the x and y lists disagree in frame count or per-frame
    /// length.
    pub fn frames(&self, label: &str) -> Result<Vec<Option<KnotContour>>, GeometryError> {
        let value = self
            .0
            .get(label)
            .ok_or_else(|| GeometryError::UnknownLabel(label.to_owned()))?;
        let LabelKnots(xs, ys) = LabelKnots::deserialize(value)
            .map_err(|err| GeometryError::MalformedStore(format!("label {label:?}: {err}")))?;
        if xs.len() != ys.len() {
            return Err(GeometryError::MalformedStore(format!(
                "label {label:?} has {} x frames but {} y frames",
                xs.len(),
                ys.len()
            )));
        }
        xs.iter()
            .zip(&ys)
            .map(|(x, y)| {
                if x.is_empty() && y.is_empty() {
                    Ok(None)
                } else {
                    KnotContour::from_xy(x, y).map(Some)
                }
            })
            .collect()
    }
}
