//! Shared types for the lumen geometry pipeline.

use serde::{Deserialize, Serialize};

use crate::contour::ContourTracerKind;

/// Re-export `GrayImage` so downstream crates can build masks from
/// decoded rasters without depending on `image` directly.
pub use image::GrayImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin, used as the "no pair" placeholder.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.x(), p.y())
    }
}

/// An implicitly closed sequence of points: the last point connects back
/// to the first. The closing point is never repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Build a `geo::Polygon` from the ring. `geo` closes the exterior
    /// ring itself.
    #[must_use]
    pub fn to_polygon(&self) -> geo::Polygon<f64> {
        to_polygon(&self.0)
    }
}

/// Build a `geo::Polygon` with no interiors from an implicitly closed ring.
pub(crate) fn to_polygon(points: &[Point]) -> geo::Polygon<f64> {
    let ring: Vec<geo::Coord<f64>> = points.iter().map(|&p| p.into()).collect();
    geo::Polygon::new(geo::LineString::new(ring), Vec::new())
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A binary segmentation mask for one frame.
///
/// Pixels are stored as `0` (background) or `1` (foreground) in a
/// [`GrayImage`], so the raster can be handed to `imageproc` directly.
#[derive(Debug, Clone)]
pub struct Mask(GrayImage);

impl Mask {
    /// An all-background mask.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        Self(GrayImage::from_fn(width, height, |x, y| {
            image::Luma([u8::from(f(x, y))])
        }))
    }

    /// Build a mask from row-major pixel bytes. Any non-zero byte is
    /// foreground.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidMask`] if `pixels.len()` is not
    /// `width * height`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GeometryError> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(GeometryError::InvalidMask {
                width,
                height,
                actual: pixels.len(),
            });
        }
        let binary = pixels.into_iter().map(|v| u8::from(v != 0)).collect();
        GrayImage::from_raw(width, height, binary)
            .map(Self)
            .ok_or(GeometryError::InvalidMask {
                width,
                height,
                actual: expected,
            })
    }

    /// Threshold a grayscale raster: any non-zero pixel is foreground.
    #[must_use]
    pub fn from_gray(gray: &GrayImage) -> Self {
        Self::from_fn(gray.width(), gray.height(), |x, y| gray.get_pixel(x, y).0[0] != 0)
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Mask dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Whether the pixel at `(x, y)` is foreground. Coordinates outside
    /// the raster are background.
    #[must_use]
    pub fn is_foreground(&self, x: i64, y: i64) -> bool {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return false;
        };
        x < self.width() && y < self.height() && self.0.get_pixel(x, y).0[0] != 0
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.0.as_raw().iter().filter(|&&v| v != 0).count()
    }

    /// Returns `true` if the mask has no foreground pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_raw().iter().all(|&v| v == 0)
    }

    /// The geometric center used to select the lumen boundary:
    /// column `⌊W/2⌋`, row `⌊H/2⌋`.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width() / 2), f64::from(self.height() / 2))
    }

    /// The underlying `0`/`1` raster.
    #[must_use]
    pub const fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    /// A viewable copy with foreground at 255.
    #[must_use]
    pub fn to_visible(&self) -> GrayImage {
        let mut out = self.0.clone();
        for p in out.pixels_mut() {
            p.0[0] = p.0[0].saturating_mul(255);
        }
        out
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.0.dimensions() == other.0.dimensions() && self.0.as_raw() == other.0.as_raw()
    }
}

/// Frame count and per-frame raster size of a pullback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Number of frames.
    pub frames: usize,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame width in pixels.
    pub width: u32,
}

/// Immutable acquisition metadata shared by every frame of a pullback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Frame count and raster size.
    pub shape: Shape,
    /// Physical size of one pixel edge in millimetres.
    pub resolution: f64,
}

impl ImageMetadata {
    /// Create metadata for `frames` frames of `height` × `width` pixels.
    #[must_use]
    pub const fn new(frames: usize, height: u32, width: u32, resolution: f64) -> Self {
        Self {
            shape: Shape {
                frames,
                height,
                width,
            },
            resolution,
        }
    }

    /// Per-frame raster size.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.shape.width,
            height: self.shape.height,
        }
    }

    /// Reference point for the centroid displacement vector.
    ///
    /// This is `(H/2, W/2)` read as `(x, y)`, which is what previously
    /// computed reports used. The two agree for square frames.
    #[must_use]
    pub fn image_center(&self) -> Point {
        Point::new(
            f64::from(self.shape.height) / 2.0,
            f64::from(self.shape.width) / 2.0,
        )
    }
}

/// Configuration for contour extraction and curve fitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of knot points kept when downsampling an extracted boundary.
    pub knot_count: usize,

    /// Number of points the spline fit is evaluated at.
    pub dense_points: usize,

    /// Which contour tracing algorithm to use on masks.
    pub contour_tracer: ContourTracerKind,
}

impl AnalysisConfig {
    /// Default number of knot points per contour.
    pub const DEFAULT_KNOT_COUNT: usize = 20;

    /// Default dense contour size.
    pub const DEFAULT_DENSE_POINTS: usize = 500;

    /// Fewest dense points a fit can be sampled at; both ends of the
    /// closed curve are always emitted.
    pub const MIN_DENSE_POINTS: usize = 2;

    /// Check the settings before any frame is processed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] if `dense_points` is below
    /// [`MIN_DENSE_POINTS`](Self::MIN_DENSE_POINTS).
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.dense_points < Self::MIN_DENSE_POINTS {
            return Err(GeometryError::InvalidConfig(format!(
                "dense_points must be at least {}, got {}",
                Self::MIN_DENSE_POINTS,
                self.dense_points
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            knot_count: Self::DEFAULT_KNOT_COUNT,
            dense_points: Self::DEFAULT_DENSE_POINTS,
            contour_tracer: ContourTracerKind::default(),
        }
    }
}

/// Errors produced by the geometry pipeline.
///
/// [`InsufficientPoints`](Self::InsufficientPoints),
/// [`NoContourFound`](Self::NoContourFound) and
/// [`DegeneratePolygon`](Self::DegeneratePolygon) are per-frame and
/// recoverable: a batch records them against the frame and moves on.
/// The remaining variants are caller precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The spline fit needs more distinct knot points.
    #[error("curve fit needs at least {required} distinct knot points, found {found}")]
    InsufficientPoints {
        /// Usable knot points found.
        found: usize,
        /// Minimum number of knot points.
        required: usize,
    },

    /// The mask is empty or no traced boundary contains the mask center.
    #[error("no contour contains the mask center")]
    NoContourFound,

    /// The width search found no valid antipodal pair.
    #[error("no valid antipodal pair for the width search")]
    DegeneratePolygon,

    /// A knot edit addressed a point that does not exist.
    #[error("knot index {index} out of range for {len} knot points")]
    KnotIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of knot points.
        len: usize,
    },

    /// A frame index or mask size does not match the pullback metadata.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Raw mask bytes do not match the stated raster size.
    #[error("mask of {width}x{height} cannot hold {actual} bytes")]
    InvalidMask {
        /// Stated width.
        width: u32,
        /// Stated height.
        height: u32,
        /// Number of bytes supplied.
        actual: usize,
    },

    /// A persisted knot store is internally inconsistent.
    #[error("malformed knot store: {0}")]
    MalformedStore(String),

    /// A persisted knot store has no entry for the requested label.
    #[error("knot store has no label {0:?}")]
    UnknownLabel(String),

    /// An [`AnalysisConfig`] value is out of range.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
}

impl GeometryError {
    /// Whether this error only affects a single frame and a batch should
    /// continue past it.
    #[must_use]
    pub const fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPoints { .. } | Self::NoContourFound | Self::DegeneratePolygon
        )
    }
}
