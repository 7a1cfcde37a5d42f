//! Tab-separated text exports.
//!
//! The pullback report has one row per computed frame with every scalar
//! metric formatted to two decimals. Centered contour tables list the
//! dense contour of a single frame relative to its centroid, in
//! millimetres, one point per row.
//!
//! These are pure functions with no I/O -- they return a `String`.

use std::fmt::Write;

use lumen_pipeline::{FrameRecord, Point};

use crate::ExportError;

/// Column names of [`to_report`], tab-separated.
pub const REPORT_HEADER: &str = "frame\tlumen_area\tlumen_circumf\tlongest_distance\tshortest_distance\telliptic_ratio\tvector_length\tvector_angle";

/// Serialize records into the pullback report.
///
/// Frame indices are written as integers and every other column with
/// two decimals. A frame without an elliptic ratio (zero width) reports
/// `0.00`.
///
/// # Examples
///
/// ```
/// use lumen_export::{REPORT_HEADER, to_report};
///
/// let report = to_report(&[]);
/// assert_eq!(report, format!("{REPORT_HEADER}\n"));
/// ```
#[must_use]
pub fn to_report(records: &[FrameRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{REPORT_HEADER}");
    for r in records {
        let _ = writeln!(
            out,
            "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            r.frame_index,
            r.area,
            r.perimeter,
            r.longest_distance,
            r.shortest_distance,
            r.elliptic_ratio.unwrap_or(0.0),
            r.vector_length,
            r.vector_angle,
        );
    }
    out
}

/// Serialize one frame's dense contour relative to its centroid.
///
/// Each row is `(x - cx) * resolution` and `(y - cy) * resolution`,
/// tab-separated, at full precision.
///
/// # Errors
///
/// Returns [`ExportError::MismatchedContour`] if the record's x and y
/// lists differ in length.
pub fn to_centered_contour(record: &FrameRecord, resolution: f64) -> Result<String, ExportError> {
    let centroid = record.centroid();
    let mut out = String::new();
    for p in contour_points(record)? {
        let _ = writeln!(
            out,
            "{}\t{}",
            (p.x - centroid.x) * resolution,
            (p.y - centroid.y) * resolution
        );
    }
    Ok(out)
}

/// Zip a record's coordinate lists back into points.
pub(crate) fn contour_points(record: &FrameRecord) -> Result<Vec<Point>, ExportError> {
    if record.contour_x.len() != record.contour_y.len() {
        return Err(ExportError::MismatchedContour {
            frame: record.frame_index,
            x: record.contour_x.len(),
            y: record.contour_y.len(),
        });
    }
    Ok(record
        .contour_x
        .iter()
        .zip(&record.contour_y)
        .map(|(&x, &y)| Point::new(x, y))
        .collect())
}
