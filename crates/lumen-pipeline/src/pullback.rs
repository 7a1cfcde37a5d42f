//! Caller-owned analysis context for one pullback.
//!
//! A [`Pullback`] holds one [`Frame`] per acquired frame: the editable
//! knot contour and the [`FrameState`] derived from it. Knots come from
//! segmentation masks ([`Pullback::from_masks`]), from manual
//! digitization ([`Pullback::from_knots`]) or from a persisted
//! [`KnotStore`]. [`Pullback::analyze`] then fits and measures every
//! stale frame, reporting progress through an [`AnalysisObserver`].
//!
//! Frames never share state, so a failure in one frame is recorded as
//! [`FrameState::Skipped`] and the batch carries on.

use serde::{Deserialize, Serialize};

use crate::contour::extract_lumen;
use crate::downsample::downsample;
use crate::knots::{KnotContour, KnotEdit, KnotStore};
use crate::metrics::{FrameMetrics, FrameState};
use crate::rasterize::rasterize;
use crate::spline::{self, DenseContour};
use crate::types::{AnalysisConfig, GeometryError, ImageMetadata, Mask, Point};

/// Receives progress from [`Pullback::analyze`] and may stop it.
///
/// Both methods have no-op defaults, so an observer only implements what
/// it needs.
pub trait AnalysisObserver {
    /// Called once after each frame the run processes.
    fn frame_completed(&mut self, _frame: usize, _state: &FrameState) {}

    /// Polled before each frame. Returning `true` stops the run; frames
    /// already computed keep their results.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl AnalysisObserver for NoProgress {}

/// Outcome of one [`Pullback::analyze`] run.
///
/// `processed` counts frames fitted by this run. The remaining counts
/// describe the whole pullback once the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Frames fitted and measured by this run.
    pub processed: usize,
    /// Frames holding computed metrics.
    pub computed: usize,
    /// Frames without a usable contour.
    pub skipped: usize,
    /// Frames still awaiting analysis.
    pub stale: usize,
    /// Whether the observer stopped the run early.
    pub cancelled: bool,
}

/// One frame: its editable knots and the state derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    knots: Option<KnotContour>,
    state: FrameState,
}

impl Frame {
    /// A frame with `knots` awaiting analysis, or skipped if there are none.
    fn new(knots: Option<KnotContour>) -> Self {
        let state = if knots.is_some() {
            FrameState::Stale
        } else {
            FrameState::Skipped(GeometryError::NoContourFound)
        };
        Self { knots, state }
    }

    fn skipped(error: GeometryError) -> Self {
        Self {
            knots: None,
            state: FrameState::Skipped(error),
        }
    }

    /// The editable knot contour, if the frame has one.
    #[must_use]
    pub const fn knots(&self) -> Option<&KnotContour> {
        self.knots.as_ref()
    }

    /// The derived state.
    #[must_use]
    pub const fn state(&self) -> &FrameState {
        &self.state
    }
}

/// Output record for one computed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Zero-based frame index within the pullback.
    pub frame_index: usize,
    /// Lumen area (mm²).
    pub area: f64,
    /// Lumen perimeter (mm).
    pub perimeter: f64,
    /// Centroid x (pixels).
    pub centroid_x: f64,
    /// Centroid y (pixels).
    pub centroid_y: f64,
    /// Longest diameter (mm).
    pub longest_distance: f64,
    /// Endpoints of the longest diameter (pixels).
    pub longest_pair: (Point, Point),
    /// Shortest antipodal width (mm).
    pub shortest_distance: f64,
    /// Endpoints of the shortest width (pixels).
    pub shortest_pair: (Point, Point),
    /// Longest over shortest, absent for a zero width.
    pub elliptic_ratio: Option<f64>,
    /// Centroid offset from the image center (mm).
    pub vector_length: f64,
    /// Centroid offset direction in degrees.
    pub vector_angle: f64,
    /// Dense contour x coordinates (pixels).
    pub contour_x: Vec<f64>,
    /// Dense contour y coordinates (pixels).
    pub contour_y: Vec<f64>,
}

impl FrameRecord {
    /// Flatten a computed frame into a record.
    #[must_use]
    pub fn new(frame_index: usize, dense: &DenseContour, metrics: &FrameMetrics) -> Self {
        Self {
            frame_index,
            area: metrics.area,
            perimeter: metrics.perimeter,
            centroid_x: metrics.centroid.x,
            centroid_y: metrics.centroid.y,
            longest_distance: metrics.longest.distance,
            longest_pair: metrics.longest.endpoints,
            shortest_distance: metrics.shortest.distance,
            shortest_pair: metrics.shortest.endpoints,
            elliptic_ratio: metrics.elliptic_ratio,
            vector_length: metrics.vector.length,
            vector_angle: metrics.vector.angle,
            contour_x: dense.xs(),
            contour_y: dense.ys(),
        }
    }

    /// The centroid as a point.
    #[must_use]
    pub const fn centroid(&self) -> Point {
        Point::new(self.centroid_x, self.centroid_y)
    }
}

/// Analysis context for one pullback.
#[derive(Debug, Clone, PartialEq)]
pub struct Pullback {
    metadata: ImageMetadata,
    config: AnalysisConfig,
    frames: Vec<Frame>,
}

impl Pullback {
    /// Extract and downsample the lumen boundary of every mask.
    ///
    /// Frames whose mask has no usable boundary start out skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] for an out-of-range
    /// `config` and [`GeometryError::ShapeMismatch`] if the number of
    /// masks or any mask's size disagrees with `metadata`. Extraction
    /// errors that only concern one frame skip that frame instead.
    pub fn from_masks(
        masks: &[Mask],
        metadata: ImageMetadata,
        config: AnalysisConfig,
    ) -> Result<Self, GeometryError> {
        config.validate()?;
        check_frame_count(masks.len(), &metadata)?;
        let expected = metadata.dimensions();
        if let Some((index, mask)) = masks
            .iter()
            .enumerate()
            .find(|(_, m)| m.dimensions() != expected)
        {
            return Err(GeometryError::ShapeMismatch(format!(
                "mask {index} is {}x{}, expected {}x{}",
                mask.width(),
                mask.height(),
                expected.width,
                expected.height
            )));
        }

        let frames = masks
            .iter()
            .enumerate()
            .map(|(index, mask)| match extract_lumen(mask, &config.contour_tracer) {
                Ok(boundary) => {
                    tracing::debug!(frame = index, vertices = boundary.len(), "extracted lumen");
                    Ok(Frame::new(Some(downsample(&boundary, config.knot_count))))
                }
                Err(err) if err.is_per_frame() => {
                    tracing::warn!(frame = index, "{err}, frame skipped");
                    Ok(Frame::skipped(err))
                }
                Err(err) => Err(err),
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        Ok(Self {
            metadata,
            config,
            frames,
        })
    }

    /// Start from knot contours, one slot per frame. `None` marks a frame
    /// without a contour.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] for an out-of-range
    /// `config` and [`GeometryError::ShapeMismatch`] if the number of
    /// slots disagrees with `metadata`.
    pub fn from_knots(
        knots: Vec<Option<KnotContour>>,
        metadata: ImageMetadata,
        config: AnalysisConfig,
    ) -> Result<Self, GeometryError> {
        config.validate()?;
        check_frame_count(knots.len(), &metadata)?;
        Ok(Self {
            metadata,
            config,
            frames: knots.into_iter().map(Frame::new).collect(),
        })
    }

    /// Load the knot contours stored under `label`.
    ///
    /// # Errors
    ///
    /// Propagates [`KnotStore::frames`] errors and returns
    /// [`GeometryError::ShapeMismatch`] if the stored frame count
    /// disagrees with `metadata`.
    pub fn from_store(
        store: &KnotStore,
        label: &str,
        metadata: ImageMetadata,
        config: AnalysisConfig,
    ) -> Result<Self, GeometryError> {
        Self::from_knots(store.frames(label)?, metadata, config)
    }

    /// Persist the current knots under `label` in a new store.
    #[must_use]
    pub fn to_store(&self, label: &str) -> KnotStore {
        let mut store = KnotStore::new();
        self.write_to_store(&mut store, label);
        store
    }

    /// Persist the current knots under `label`, replacing any previous
    /// entry for it.
    pub fn write_to_store(&self, store: &mut KnotStore, label: &str) {
        let knots: Vec<Option<KnotContour>> = self.frames.iter().map(|f| f.knots.clone()).collect();
        store.insert(label, &knots);
    }

    /// Acquisition metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Analysis configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// All frames, in acquisition order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// One frame, if `index` is in range.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` for a pullback without frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fit and measure every stale frame in order.
    ///
    /// Computed and skipped frames are left alone. The observer is polled
    /// for cancellation before each frame and notified after each frame
    /// this run processes.
    pub fn analyze(&mut self, observer: &mut impl AnalysisObserver) -> AnalysisSummary {
        let mut processed = 0;
        let mut cancelled = false;

        for index in 0..self.frames.len() {
            if observer.is_cancelled() {
                tracing::info!(frame = index, "analysis cancelled");
                cancelled = true;
                break;
            }
            let frame = &mut self.frames[index];
            if !frame.state.is_stale() {
                continue;
            }
            frame.state = derive_state(index, frame.knots.as_ref(), &self.config, &self.metadata);
            processed += 1;
            observer.frame_completed(index, &frame.state);
        }

        let summary = self.summary(processed, cancelled);
        tracing::info!(
            processed = summary.processed,
            computed = summary.computed,
            skipped = summary.skipped,
            stale = summary.stale,
            "analysis finished"
        );
        summary
    }

    /// Apply `edit` to one frame's knots and recompute that frame.
    ///
    /// Appending to a frame without knots starts a new contour there.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ShapeMismatch`] for a frame index out of
    /// range and [`GeometryError::KnotIndexOutOfRange`] for a move that
    /// addresses a missing knot. The frame is unchanged on error.
    pub fn edit_knots(&mut self, index: usize, edit: KnotEdit) -> Result<&FrameState, GeometryError> {
        let frame_count = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or_else(|| frame_out_of_range(index, frame_count))?;

        match frame.knots.as_mut() {
            Some(knots) => knots.apply(edit)?,
            None => match edit {
                KnotEdit::Append(p) => frame.knots = Some(KnotContour::new(vec![p])),
                KnotEdit::Move { index: knot, .. } => {
                    return Err(GeometryError::KnotIndexOutOfRange {
                        index: knot,
                        len: 0,
                    });
                }
            },
        }

        frame.state = derive_state(index, frame.knots.as_ref(), &self.config, &self.metadata);
        Ok(&frame.state)
    }

    /// Replace one frame's knots. The frame becomes stale, or skipped
    /// when `knots` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ShapeMismatch`] for a frame index out of
    /// range.
    pub fn set_knots(&mut self, index: usize, knots: Option<KnotContour>) -> Result<(), GeometryError> {
        let frame_count = self.frames.len();
        let frame = self
            .frames
            .get_mut(index)
            .ok_or_else(|| frame_out_of_range(index, frame_count))?;
        *frame = Frame::new(knots);
        Ok(())
    }

    /// One record per computed frame, in frame order.
    #[must_use]
    pub fn records(&self) -> Vec<FrameRecord> {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(index, frame)| match &frame.state {
                FrameState::Computed { dense, metrics } => {
                    Some(FrameRecord::new(index, dense, metrics))
                }
                _ => None,
            })
            .collect()
    }

    /// Rasterize every frame's dense contour. Frames without one (or
    /// whose knots cannot be fitted) give empty masks.
    #[must_use]
    pub fn to_masks(&self) -> Vec<Mask> {
        let dimensions = self.metadata.dimensions();
        self.frames
            .iter()
            .map(|frame| {
                let fitted;
                let dense = match (&frame.state, &frame.knots) {
                    (FrameState::Computed { dense, .. }, _) => Some(dense),
                    (_, Some(knots)) => {
                        fitted = spline::fit(knots, self.config.dense_points).ok();
                        fitted.as_ref()
                    }
                    (_, None) => None,
                };
                dense.map_or_else(
                    || Mask::empty(dimensions.width, dimensions.height),
                    |d| rasterize(d.points(), dimensions),
                )
            })
            .collect()
    }

    fn summary(&self, processed: usize, cancelled: bool) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            processed,
            cancelled,
            ..AnalysisSummary::default()
        };
        for frame in &self.frames {
            match frame.state {
                FrameState::Stale => summary.stale += 1,
                FrameState::Computed { .. } => summary.computed += 1,
                FrameState::Skipped(_) => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Fit and measure one frame's knots.
fn derive_state(
    index: usize,
    knots: Option<&KnotContour>,
    config: &AnalysisConfig,
    metadata: &ImageMetadata,
) -> FrameState {
    let Some(knots) = knots else {
        return FrameState::Skipped(GeometryError::NoContourFound);
    };
    match spline::fit(knots, config.dense_points) {
        Ok(dense) => {
            let metrics = FrameMetrics::compute(&dense, metadata);
            tracing::debug!(
                frame = index,
                area = metrics.area,
                perimeter = metrics.perimeter,
                "frame computed"
            );
            FrameState::Computed { dense, metrics }
        }
        Err(err) => {
            tracing::warn!(frame = index, knots = knots.len(), "{err}, frame skipped");
            FrameState::Skipped(err)
        }
    }
}

fn check_frame_count(found: usize, metadata: &ImageMetadata) -> Result<(), GeometryError> {
    if found == metadata.shape.frames {
        Ok(())
    } else {
        Err(GeometryError::ShapeMismatch(format!(
            "{found} frames supplied, metadata declares {}",
            metadata.shape.frames
        )))
    }
}

fn frame_out_of_range(index: usize, frames: usize) -> GeometryError {
    GeometryError::ShapeMismatch(format!("frame {index} out of range for {frames} frames"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn meta(frames: usize) -> ImageMetadata {
        ImageMetadata::new(frames, 64, 64, 0.1)
    }

    fn disk(radius: f64) -> Mask {
        Mask::from_fn(64, 64, |x, y| {
            let (dx, dy) = (f64::from(x) - 32.0, f64::from(y) - 32.0);
            dx.hypot(dy) <= radius
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn ring(n: usize, radius: f64) -> KnotContour {
        KnotContour::new(
            (0..n)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / n as f64;
                    Point::new(radius.mul_add(a.cos(), 32.0), radius.mul_add(a.sin(), 32.0))
                })
                .collect(),
        )
    }

    /// Records the frames it sees and cancels after `limit` of them.
    struct Recorder {
        seen: Vec<usize>,
        limit: usize,
    }

    impl AnalysisObserver for Recorder {
        fn frame_completed(&mut self, frame: usize, _state: &FrameState) {
            self.seen.push(frame);
        }

        fn is_cancelled(&self) -> bool {
            self.seen.len() >= self.limit
        }
    }

    #[test]
    fn masks_are_extracted_and_analyzed() {
        let masks = vec![disk(10.0), Mask::empty(64, 64), disk(15.0)];
        let mut pullback =
            Pullback::from_masks(&masks, meta(3), AnalysisConfig::default()).unwrap();

        assert_eq!(pullback.frame(0).unwrap().knots().unwrap().len(), 20);
        assert_eq!(
            pullback.frame(1).unwrap().state(),
            &FrameState::Skipped(GeometryError::NoContourFound)
        );

        let summary = pullback.analyze(&mut NoProgress);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.computed, 2);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.cancelled);

        let records = pullback.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame_index, 0);
        assert_eq!(records[1].frame_index, 2);
        assert!(records[1].area > records[0].area);
        assert_eq!(records[0].contour_x.len(), 500);
    }

    #[test]
    fn mask_size_mismatch_is_rejected() {
        let masks = vec![Mask::empty(32, 64)];
        let err = Pullback::from_masks(&masks, meta(1), AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, GeometryError::ShapeMismatch(_)));
    }

    #[test]
    fn frame_count_mismatch_is_rejected() {
        let err = Pullback::from_knots(vec![None], meta(2), AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, GeometryError::ShapeMismatch(_)));
    }

    #[test]
    fn too_few_knots_skip_the_frame() {
        let few = KnotContour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        let mut pullback =
            Pullback::from_knots(vec![Some(few), Some(ring(20, 8.0))], meta(2), AnalysisConfig::default())
                .unwrap();
        let summary = pullback.analyze(&mut NoProgress);
        assert_eq!(summary.computed, 1);
        assert!(matches!(
            pullback.frame(0).unwrap().state(),
            FrameState::Skipped(GeometryError::InsufficientPoints { found: 3, .. })
        ));
    }

    #[test]
    fn cancellation_keeps_completed_frames() {
        let knots = (0..5).map(|_| Some(ring(20, 8.0))).collect();
        let mut pullback = Pullback::from_knots(knots, meta(5), AnalysisConfig::default()).unwrap();
        let mut observer = Recorder {
            seen: Vec::new(),
            limit: 2,
        };

        let summary = pullback.analyze(&mut observer);
        assert!(summary.cancelled);
        assert_eq!(observer.seen, vec![0, 1]);
        assert_eq!(summary.computed, 2);
        assert_eq!(summary.stale, 3);

        // Resuming only processes what is left.
        let mut rest = Recorder {
            seen: Vec::new(),
            limit: usize::MAX,
        };
        let summary = pullback.analyze(&mut rest);
        assert_eq!(rest.seen, vec![2, 3, 4]);
        assert_eq!(summary.computed, 5);
        assert_eq!(summary.stale, 0);
    }

    #[test]
    fn edit_recomputes_only_that_frame() {
        let knots = vec![Some(ring(20, 8.0)), Some(ring(20, 8.0))];
        let mut pullback = Pullback::from_knots(knots, meta(2), AnalysisConfig::default()).unwrap();
        pullback.analyze(&mut NoProgress);
        let before = pullback.records();

        let state = pullback
            .edit_knots(
                0,
                KnotEdit::Move {
                    index: 0,
                    to: Point::new(46.0, 32.0),
                },
            )
            .unwrap();
        let area = state.metrics().unwrap().area;
        assert!(area > before[0].area);

        let after = pullback.records();
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn edit_errors_leave_frame_unchanged() {
        let mut pullback =
            Pullback::from_knots(vec![Some(ring(20, 8.0)), None], meta(2), AnalysisConfig::default())
                .unwrap();
        let move_far = KnotEdit::Move {
            index: 20,
            to: Point::ORIGIN,
        };
        assert_eq!(
            pullback.edit_knots(0, move_far),
            Err(GeometryError::KnotIndexOutOfRange { index: 20, len: 20 })
        );
        assert!(pullback.frame(0).unwrap().state().is_stale());
        assert!(matches!(
            pullback.edit_knots(5, KnotEdit::Append(Point::ORIGIN)),
            Err(GeometryError::ShapeMismatch(_))
        ));
        assert_eq!(
            pullback.edit_knots(1, move_far),
            Err(GeometryError::KnotIndexOutOfRange { index: 20, len: 0 })
        );
    }

    #[test]
    fn append_starts_a_contour() {
        let mut pullback =
            Pullback::from_knots(vec![None], meta(1), AnalysisConfig::default()).unwrap();
        let state = pullback
            .edit_knots(0, KnotEdit::Append(Point::new(10.0, 10.0)))
            .unwrap();
        assert!(matches!(
            state,
            FrameState::Skipped(GeometryError::InsufficientPoints { .. })
        ));
        assert_eq!(pullback.frame(0).unwrap().knots().unwrap().len(), 1);
    }

    #[test]
    fn set_knots_marks_stale() {
        let mut pullback =
            Pullback::from_knots(vec![Some(ring(20, 8.0))], meta(1), AnalysisConfig::default()).unwrap();
        pullback.analyze(&mut NoProgress);
        pullback.set_knots(0, Some(ring(12, 6.0))).unwrap();
        assert!(pullback.frame(0).unwrap().state().is_stale());
        pullback.set_knots(0, None).unwrap();
        assert_eq!(
            pullback.frame(0).unwrap().state(),
            &FrameState::Skipped(GeometryError::NoContourFound)
        );
    }

    #[test]
    fn store_round_trip() {
        let original =
            Pullback::from_knots(vec![Some(ring(20, 8.0)), None], meta(2), AnalysisConfig::default())
                .unwrap();
        let store = original.to_store("lumen");
        let restored =
            Pullback::from_store(&store, "lumen", meta(2), AnalysisConfig::default()).unwrap();
        assert_eq!(restored, original);
        assert_eq!(
            Pullback::from_store(&store, "vessel", meta(2), AnalysisConfig::default()),
            Err(GeometryError::UnknownLabel("vessel".to_owned()))
        );
    }

    #[test]
    fn write_to_store_replaces_only_its_label() {
        let vessel = Pullback::from_knots(vec![Some(ring(20, 14.0)), None], meta(2), AnalysisConfig::default())
            .unwrap();
        let mut store = vessel.to_store("vessel");
        store.insert("lumen", &[None, Some(ring(5, 3.0))]);

        let lumen =
            Pullback::from_knots(vec![Some(ring(20, 8.0)), None], meta(2), AnalysisConfig::default())
                .unwrap();
        lumen.write_to_store(&mut store, "lumen");

        assert_eq!(store.labels().collect::<Vec<_>>(), vec!["lumen", "vessel"]);
        assert_eq!(store.frames("vessel"), vessel.to_store("vessel").frames("vessel"));
        assert_eq!(
            store.frames("lumen").unwrap(),
            vec![Some(ring(20, 8.0)), None]
        );
    }

    #[test]
    fn out_of_range_config_is_rejected() {
        let config = AnalysisConfig {
            dense_points: 1,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            Pullback::from_masks(&[disk(10.0)], meta(1), config.clone()),
            Err(GeometryError::InvalidConfig(_))
        ));
        assert!(matches!(
            Pullback::from_knots(vec![Some(ring(20, 8.0))], meta(1), config),
            Err(GeometryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn masks_rasterize_dense_contours() {
        let mut pullback =
            Pullback::from_knots(vec![Some(ring(20, 10.0)), None], meta(2), AnalysisConfig::default())
                .unwrap();
        // Stale frames are fitted on the fly.
        let stale = pullback.to_masks();
        pullback.analyze(&mut NoProgress);
        let computed = pullback.to_masks();
        assert_eq!(stale, computed);

        assert!(computed[1].is_empty());
        #[allow(clippy::cast_precision_loss)]
        let area = computed[0].foreground_count() as f64;
        let expected = std::f64::consts::PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05, "area {area}");
    }
}
