//! lumen-pipeline: Pure lumen contour geometry (sans-IO).
//!
//! Turns per-frame vessel segmentation masks into smooth closed lumen
//! contours and shape metrics through:
//! contour extraction -> knot downsampling -> periodic spline fit ->
//! polygon metrics, diameters and centroid vector.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! masks and knot lists and returns structured data. Decoding images,
//! reading knot files and writing reports live in `lumen-bench` and
//! `lumen-export`.

pub mod contour;
pub mod diameter;
pub mod downsample;
pub mod knots;
pub mod metrics;
pub mod polygon;
pub mod pullback;
pub mod rasterize;
pub mod spline;
pub mod types;
pub mod vector;

pub use contour::{ContourTracer, ContourTracerKind};
pub use knots::{KnotContour, KnotEdit, KnotStore};
pub use metrics::{FrameMetrics, FrameState};
pub use pullback::{AnalysisObserver, AnalysisSummary, FrameRecord, NoProgress, Pullback};
pub use spline::DenseContour;
pub use types::{
    AnalysisConfig, Dimensions, GeometryError, ImageMetadata, Mask, Point, Polyline, Shape,
};

/// Everything derived from a single mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskAnalysis {
    /// Downsampled lumen boundary.
    pub knots: KnotContour,
    /// Spline fit through `knots`.
    pub dense: DenseContour,
    /// Metrics of `dense`.
    pub metrics: FrameMetrics,
}

/// Run the full geometry pipeline on one mask.
///
/// # Pipeline steps
///
/// 1. Contour extraction (pluggable strategy) and lumen selection
/// 2. Downsampling to `config.knot_count` knot points
/// 3. Periodic spline fit sampled at `config.dense_points`
/// 4. Area, perimeter, centroid, diameters and centroid vector
///
/// # Errors
///
/// Returns [`GeometryError::NoContourFound`] if no boundary encloses the
/// mask center, [`GeometryError::InsufficientPoints`] if the knots
/// cannot be fitted and [`GeometryError::InvalidConfig`] if `config` is
/// out of range.
pub fn analyze_mask(
    mask: &Mask,
    metadata: &ImageMetadata,
    config: &AnalysisConfig,
) -> Result<MaskAnalysis, GeometryError> {
    config.validate()?;
    let boundary = contour::extract_lumen(mask, &config.contour_tracer)?;
    let knots = downsample::downsample(&boundary, config.knot_count);
    let dense = spline::fit(&knots, config.dense_points)?;
    let metrics = FrameMetrics::compute(&dense, metadata);
    Ok(MaskAnalysis {
        knots,
        dense,
        metrics,
    })
}
