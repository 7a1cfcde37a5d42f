//! lumen-bench: CLI tool for lumen contour analysis of a pullback.
//!
//! Loads a stack of binary segmentation masks (one image per frame) or a
//! previously saved knot file, runs the analysis on every frame and
//! writes the requested outputs. Useful for:
//!
//! - Producing the tab-separated pullback report
//! - Exporting centroid-centered contour tables and SVG overlays
//! - Saving extracted knot points for later manual correction
//! - Comparing contour tracers and knot/dense point counts
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin lumen-bench -- --masks frames/*.png --resolution 0.02 --report report.txt
//! cargo run --release --bin lumen-bench -- --knots contours.json --width 512 --height 512 --json
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::DynamicImage;
use lumen_pipeline::{
    AnalysisConfig, AnalysisObserver, ContourTracerKind, FrameState, ImageMetadata, KnotStore,
    Mask, Pullback,
};
use tracing_subscriber::EnvFilter;

/// Lumen contour extraction, curve fitting and shape metrics.
///
/// Analyzes every frame of a pullback and writes the report, per-frame
/// contour tables, SVG overlays, knot files and rasterized masks.
#[derive(Parser)]
#[command(name = "lumen-bench", version)]
struct Cli {
    /// Binary mask images, one per frame, in frame order.
    #[arg(long, num_args = 1.., required_unless_present = "knots", conflicts_with = "knots")]
    masks: Vec<PathBuf>,

    /// Knot file (JSON) to analyze instead of masks.
    #[arg(long)]
    knots: Option<PathBuf>,

    /// Frame width in pixels, required with `--knots`.
    #[arg(long, requires = "knots")]
    width: Option<u32>,

    /// Frame height in pixels, required with `--knots`.
    #[arg(long, requires = "knots")]
    height: Option<u32>,

    /// Label of the contours in the knot file.
    #[arg(long, default_value = "lumen")]
    label: String,

    /// Pixel size in millimetres.
    #[arg(long, default_value_t = 1.0)]
    resolution: f64,

    /// Number of knot points kept per extracted contour.
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_KNOT_COUNT)]
    knot_count: usize,

    /// Number of points each fitted contour is sampled at.
    #[arg(long, default_value_t = AnalysisConfig::DEFAULT_DENSE_POINTS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..))]
    dense_points: usize,

    /// Contour tracing algorithm for masks.
    #[arg(long, value_enum, default_value_t = Tracer::MarchingSquares)]
    tracer: Tracer,

    /// Write the tab-separated report to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write one centroid-centered contour table per frame to this directory.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Write one SVG overlay per frame to this directory.
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Write one rasterized mask PNG per frame to this directory.
    #[arg(long)]
    mask_dir: Option<PathBuf>,

    /// Save the knot points to this JSON file, keeping other labels
    /// already stored there.
    #[arg(long)]
    save_knots: Option<PathBuf>,

    /// Print frame records as JSON instead of the report.
    #[arg(long)]
    json: bool,

    /// Full analysis config as a JSON string.
    ///
    /// When provided, `--knot-count`, `--dense-points` and `--tracer`
    /// are ignored. The JSON must be a valid `AnalysisConfig`
    /// serialization; missing fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Contour tracing algorithm selection.
#[derive(Clone, Copy, ValueEnum)]
enum Tracer {
    /// Iso-contour between pixel centers.
    MarchingSquares,
    /// Suzuki-Abe border following through boundary pixels.
    BorderFollowing,
}

/// Build an [`AnalysisConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<AnalysisConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        AnalysisConfig {
            knot_count: cli.knot_count,
            dense_points: cli.dense_points,
            contour_tracer: match cli.tracer {
                Tracer::MarchingSquares => ContourTracerKind::MarchingSquares,
                Tracer::BorderFollowing => ContourTracerKind::BorderFollowing,
            },
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Logs each analyzed frame.
struct LogProgress {
    total: usize,
}

impl AnalysisObserver for LogProgress {
    fn frame_completed(&mut self, frame: usize, state: &FrameState) {
        match state {
            FrameState::Computed { metrics, .. } => tracing::info!(
                "frame {}/{}: area {:.2} mm², ratio {}",
                frame + 1,
                self.total,
                metrics.area,
                metrics
                    .elliptic_ratio
                    .map_or_else(|| "n/a".to_owned(), |r| format!("{r:.2}")),
            ),
            FrameState::Skipped(err) => {
                tracing::info!("frame {}/{}: skipped ({err})", frame + 1, self.total);
            }
            FrameState::Stale => {}
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            tracing::error!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;
    tracing::debug!(?config, "analysis config");

    let mut pullback = if let Some(ref path) = cli.knots {
        load_knots(cli, path, config)?
    } else {
        load_masks(cli, config)?
    };

    let summary = pullback.analyze(&mut LogProgress {
        total: pullback.len(),
    });
    tracing::info!(
        "{} of {} frames computed, {} skipped",
        summary.computed,
        pullback.len(),
        summary.skipped,
    );

    let records = pullback.records();
    let metadata = *pullback.metadata();

    if cli.json {
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| format!("Error serializing records: {e}"))?;
        println!("{json}");
    } else if cli.report.is_none() {
        print!("{}", lumen_export::to_report(&records));
    }

    if let Some(ref path) = cli.report {
        write_file(path, &lumen_export::to_report(&records))?;
    }

    if let Some(ref dir) = cli.csv_dir {
        create_dir(dir)?;
        for record in &records {
            let table = lumen_export::to_centered_contour(record, metadata.resolution)
                .map_err(|e| e.to_string())?;
            write_file(&dir.join(format!("{}_contours.csv", record.frame_index)), &table)?;
        }
    }

    if let Some(ref dir) = cli.svg_dir {
        create_dir(dir)?;
        let config_json = serde_json::to_string(pullback.config())
            .map_err(|e| format!("Error serializing config: {e}"))?;
        for record in &records {
            let title = format!("{} frame {}", cli.label, record.frame_index + 1);
            let svg = lumen_export::to_frame_svg(
                record,
                metadata.dimensions(),
                &lumen_export::SvgMetadata {
                    title: Some(&title),
                    description: None,
                    config_json: Some(&config_json),
                },
            )
            .map_err(|e| e.to_string())?;
            write_file(&dir.join(format!("frame_{:04}.svg", record.frame_index)), &svg)?;
        }
    }

    if let Some(ref dir) = cli.mask_dir {
        create_dir(dir)?;
        for (index, mask) in pullback.to_masks().iter().enumerate() {
            let path = dir.join(format!("frame_{index:04}.png"));
            mask.to_visible()
                .save(&path)
                .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
        }
        tracing::info!("{} masks written to {}", pullback.len(), dir.display());
    }

    if let Some(ref path) = cli.save_knots {
        let mut store = if path.exists() {
            read_store(path)?
        } else {
            KnotStore::new()
        };
        pullback.write_to_store(&mut store, &cli.label);
        let json = serde_json::to_string(&store)
            .map_err(|e| format!("Error serializing knots: {e}"))?;
        write_file(path, &json)?;
    }

    Ok(())
}

/// Decode every mask image and extract its knots.
fn load_masks(cli: &Cli, config: AnalysisConfig) -> Result<Pullback, String> {
    let masks = cli
        .masks
        .iter()
        .map(|path| {
            image::open(path)
                .map(|img| decode_mask(&img))
                .map_err(|e| format!("Error reading {}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = masks.first().ok_or("No mask images given")?;
    let metadata = ImageMetadata::new(masks.len(), first.height(), first.width(), cli.resolution);
    tracing::info!(
        "{} masks of {}x{} pixels",
        masks.len(),
        first.width(),
        first.height(),
    );

    Pullback::from_masks(&masks, metadata, config).map_err(|e| e.to_string())
}

/// Threshold a decoded image at its native bit depth.
///
/// 16-bit label images commonly hold 0/1 values, which narrowing to
/// 8 bits would round down to background.
fn decode_mask(img: &DynamicImage) -> Mask {
    match img {
        DynamicImage::ImageLuma16(gray) => {
            Mask::from_fn(gray.width(), gray.height(), |x, y| gray.get_pixel(x, y).0[0] != 0)
        }
        other => Mask::from_gray(&other.to_luma8()),
    }
}

/// Read knot contours for `cli.label` from a knot file.
fn load_knots(cli: &Cli, path: &Path, config: AnalysisConfig) -> Result<Pullback, String> {
    let (Some(width), Some(height)) = (cli.width, cli.height) else {
        return Err("--knots needs --width and --height".to_owned());
    };
    let store = read_store(path)?;
    let frames = store.frames(&cli.label).map_err(|e| e.to_string())?;
    let metadata = ImageMetadata::new(frames.len(), height, width, cli.resolution);
    tracing::info!("{} frames of {:?} knots from {}", frames.len(), cli.label, path.display());

    Pullback::from_knots(frames, metadata, config).map_err(|e| e.to_string())
}

fn read_store(path: &Path) -> Result<KnotStore, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    std::fs::write(path, contents)
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    tracing::info!("{} written ({} bytes)", path.display(), contents.len());
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Error creating {}: {e}", dir.display()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_config() {
        let cli = Cli::try_parse_from([
            "lumen-bench",
            "--masks",
            "a.png",
            "b.png",
            "--knot-count",
            "12",
            "--tracer",
            "border-following",
        ])
        .unwrap();
        assert_eq!(cli.masks.len(), 2);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.knot_count, 12);
        assert_eq!(config.dense_points, AnalysisConfig::DEFAULT_DENSE_POINTS);
        assert_eq!(config.contour_tracer, ContourTracerKind::BorderFollowing);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "lumen-bench",
            "--knots",
            "k.json",
            "--knot-count",
            "12",
            "--config-json",
            r#"{"dense_points": 100}"#,
        ])
        .unwrap();
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.knot_count, AnalysisConfig::DEFAULT_KNOT_COUNT);
        assert_eq!(config.dense_points, 100);
    }

    #[test]
    fn config_json_is_validated() {
        let cli = Cli::try_parse_from([
            "lumen-bench",
            "--knots",
            "k.json",
            "--config-json",
            r#"{"dense_points": 1}"#,
        ])
        .unwrap();
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.contains("dense_points"), "{err}");
    }

    #[test]
    fn sixteen_bit_labels_are_foreground() {
        let gray = image::ImageBuffer::from_fn(4, 3, |x, _| image::Luma([u16::from(x >= 2)]));
        let mask = decode_mask(&DynamicImage::ImageLuma16(gray));
        assert_eq!(mask.foreground_count(), 6);
        assert!(mask.is_foreground(3, 0));
        assert!(!mask.is_foreground(1, 0));
    }

    #[test]
    fn eight_bit_masks_threshold_non_zero() {
        let gray = image::GrayImage::from_fn(2, 2, |x, y| image::Luma([u8::from(x == y)]));
        let mask = decode_mask(&DynamicImage::ImageLuma8(gray));
        assert_eq!(mask.foreground_count(), 2);
    }

    #[test]
    fn masks_and_knots_conflict() {
        assert!(
            Cli::try_parse_from(["lumen-bench", "--masks", "a.png", "--knots", "k.json"]).is_err()
        );
        assert!(Cli::try_parse_from(["lumen-bench"]).is_err());
    }

    #[test]
    fn knots_need_frame_size() {
        let cli = Cli::try_parse_from(["lumen-bench", "--knots", "k.json"]).unwrap();
        let path = cli.knots.clone().unwrap();
        let err = load_knots(&cli, &path, AnalysisConfig::default()).unwrap_err();
        assert!(err.contains("--width"));
    }
}
