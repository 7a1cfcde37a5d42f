//! SVG frame overlay serializer.
//!
//! Renders one frame's analysis in image pixel coordinates, so the
//! document can be laid over the source frame: the dense lumen contour,
//! the centroid, the longest diameter and the shortest antipodal width,
//! plus a short text summary of the metrics.
//!
//! Documents are built with the [`svg`] crate, which handles XML escaping
//! and path data formatting.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Line, Path, Title};
use svg::node::{Node, Text, Value};

use lumen_pipeline::{Dimensions, FrameRecord, Point};

use crate::ExportError;
use crate::report::contour_points;

/// Radius of the centroid and endpoint markers, in pixels.
const MARKER_RADIUS: f64 = 1.5;

/// Font size of the metric summary, in pixels.
const FONT_SIZE: f64 = 10.0;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the pullback name and frame number.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized `AnalysisConfig`, emitted inside a `<metadata>`
    /// element wrapped in a namespaced `<lumen:analysis>` element so the
    /// overlay records the settings that produced it.
    pub config_json: Option<&'a str>,
}

/// Build a closed SVG path `d` attribute from contour points.
///
/// Uses `M` for the first point, `L` for the rest, and `Z` to close the
/// ring. Returns an empty string for fewer than 2 points.
///
/// # Examples
///
/// ```
/// use lumen_pipeline::Point;
/// use lumen_export::build_path_data;
///
/// let d = build_path_data(&[
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.0),
///     Point::new(10.0, 40.0),
/// ]);
/// assert!(d.starts_with("M10,20 L30,40 L10,40"));
/// ```
#[must_use]
pub fn build_path_data(points: &[Point]) -> String {
    let [first, rest @ ..] = points else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data.close()))
}

/// Serialize one frame's record into an SVG overlay.
///
/// The `viewBox` matches `dimensions`, so coordinates are image pixels.
///
/// # Errors
///
/// Returns [`ExportError::MismatchedContour`] if the record's x and y
/// lists differ in length.
pub fn to_frame_svg(
    record: &FrameRecord,
    dimensions: Dimensions,
    metadata: &SvgMetadata<'_>,
) -> Result<String, ExportError> {
    let contour = contour_points(record)?;
    let Dimensions { width, height } = dimensions;

    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (0, 0, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    if let Some(config_json) = metadata.config_json {
        let mut analysis_el = Element::new("lumen:analysis");
        analysis_el.assign("xmlns:lumen", "https://lumen.invalid/ns/1");
        analysis_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(analysis_el);
        doc = doc.add(metadata_el);
    }

    let d = build_path_data(&contour);
    if !d.is_empty() {
        doc = doc.add(
            Path::new()
                .set("id", "contour")
                .set("d", d)
                .set("fill", "none")
                .set("stroke", "lime")
                .set("stroke-width", 1),
        );
    }

    doc = doc
        .add(pair_group("longest", record.longest_pair, "royalblue"))
        .add(pair_group("shortest", record.shortest_pair, "gold"))
        .add(
            Circle::new()
                .set("id", "centroid")
                .set("cx", record.centroid_x)
                .set("cy", record.centroid_y)
                .set("r", MARKER_RADIUS)
                .set("fill", "red"),
        )
        .add(summary(record));

    // The svg crate omits the XML declaration, so we prepend it.
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n"))
}

/// A line between `pair` with a marker on each end.
fn pair_group(id: &str, (a, b): (Point, Point), color: &str) -> Group {
    let marker = |p: Point| {
        Circle::new()
            .set("cx", p.x)
            .set("cy", p.y)
            .set("r", MARKER_RADIUS)
            .set("fill", color)
    };
    Group::new()
        .set("id", id)
        .add(
            Line::new()
                .set("x1", a.x)
                .set("y1", a.y)
                .set("x2", b.x)
                .set("y2", b.y)
                .set("stroke", color)
                .set("stroke-width", 1),
        )
        .add(marker(a))
        .add(marker(b))
}

/// Metric summary text in the top-left corner.
fn summary(record: &FrameRecord) -> Group {
    let ratio = record
        .elliptic_ratio
        .map_or_else(|| "n/a".to_owned(), |r| format!("{r:.2}"));
    let lines = [
        format!("Frame {}", record.frame_index + 1),
        format!("Lumen area: {:.2} mm\u{b2}", record.area),
        format!("Longest distance: {:.2} mm", record.longest_distance),
        format!("Shortest distance: {:.2} mm", record.shortest_distance),
        format!("Elliptic ratio: {ratio}"),
    ];

    let mut group = Group::new()
        .set("id", "summary")
        .set("font-family", "sans-serif")
        .set("font-size", FONT_SIZE)
        .set("fill", "white");
    for (row, line) in (1_u32..).zip(lines) {
        let mut text = Element::new("text");
        text.assign("x", FONT_SIZE / 2.0);
        text.assign("y", f64::from(row) * FONT_SIZE * 1.2);
        text.append(Text::new(line));
        group = group.add(text);
    }
    group
}
