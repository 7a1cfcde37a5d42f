//! lumen-export: Pure format serializers (sans-IO)
//!
//! Converts per-frame analysis records into output formats: the
//! tab-separated pullback report, centroid-centered contour tables and
//! an SVG overlay per frame.

pub mod report;
pub mod svg;

pub use report::{REPORT_HEADER, to_centered_contour, to_report};
pub use svg::{SvgMetadata, build_path_data, to_frame_svg};

/// Errors produced while serializing a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The record's dense contour has different x and y counts.
    #[error("frame {frame}: contour has {x} x values but {y} y values")]
    MismatchedContour {
        /// Frame index of the offending record.
        frame: usize,
        /// Number of x coordinates.
        x: usize,
        /// Number of y coordinates.
        y: usize,
    },
}
