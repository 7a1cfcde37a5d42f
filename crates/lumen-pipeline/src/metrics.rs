//! Per-frame shape metrics and their lifecycle.

use serde::{Deserialize, Serialize};

use crate::diameter::{self, Diameter};
use crate::polygon;
use crate::spline::DenseContour;
use crate::types::{GeometryError, ImageMetadata, Point};
use crate::vector::{self, CentroidVector};

/// Every metric derived from one frame's dense contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Enclosed area (mm²).
    pub area: f64,
    /// Boundary length (mm).
    pub perimeter: f64,
    /// Area-weighted centroid (pixels).
    pub centroid: Point,
    /// All-pairs maximum distance.
    pub longest: Diameter,
    /// Index-antipodal minimum distance; [`Diameter::ZERO`] when the
    /// width search failed.
    pub shortest: Diameter,
    /// `longest / shortest`, absent when the width is zero.
    pub elliptic_ratio: Option<f64>,
    /// Offset of the centroid from the image center.
    pub vector: CentroidVector,
}

impl FrameMetrics {
    /// Measure `contour` with the pullback's resolution and image center.
    #[must_use]
    pub fn compute(contour: &DenseContour, metadata: &ImageMetadata) -> Self {
        let resolution = metadata.resolution;
        let shape = polygon::measure(contour, resolution);
        let diameters = diameter::analyze(contour, resolution);
        let vector =
            vector::centroid_vector(shape.centroid, metadata.image_center(), resolution);

        Self {
            area: shape.area,
            perimeter: shape.perimeter,
            centroid: shape.centroid,
            longest: diameters.longest,
            shortest: diameters.shortest,
            elliptic_ratio: diameters.elliptic_ratio(),
            vector,
        }
    }
}

/// Where a frame is in its analysis lifecycle.
///
/// Replaces zero-valued "not computed" sentinels: a `Computed` frame may
/// legitimately hold zeros, and a frame that could not be analyzed says
/// why.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FrameState {
    /// Not analyzed yet, or the knots changed since the last analysis.
    #[default]
    Stale,
    /// The dense contour and metrics derived from the current knots.
    Computed {
        /// Curve fitted through the current knots.
        dense: DenseContour,
        /// Metrics of `dense`.
        metrics: FrameMetrics,
    },
    /// The frame was analyzed and has no usable contour.
    Skipped(GeometryError),
}

impl FrameState {
    /// Metrics, if computed.
    #[must_use]
    pub const fn metrics(&self) -> Option<&FrameMetrics> {
        match self {
            Self::Computed { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    /// Dense contour, if computed.
    #[must_use]
    pub const fn dense(&self) -> Option<&DenseContour> {
        match self {
            Self::Computed { dense, .. } => Some(dense),
            _ => None,
        }
    }

    /// Returns `true` for [`FrameState::Stale`].
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}
