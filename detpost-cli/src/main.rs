use clap::Parser;
use detpost::overlay::{draw_detections, OverlayStyle};
use detpost::{Detection, ImageGeometry, Pipeline, PipelineConfig, RawOutput, SuppressionMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Detection post-processing CLI (JSON tensor dumps)")]
struct Cli {
    /// Path to a JSON tensor dump produced by the host model.
    #[arg(value_name = "TENSORS")]
    input: PathBuf,
    /// Path to a labels.json array mapping class index to label.
    #[arg(short, long, value_name = "FILE")]
    labels: Option<PathBuf>,
    /// Stroke surviving boxes onto this image and save a copy.
    #[arg(long, value_name = "IMAGE")]
    overlay: Option<PathBuf>,
    /// Output path for the overlay image.
    #[arg(long, value_name = "FILE", default_value = "detections.png")]
    overlay_out: PathBuf,
    /// Maximum number of detections to keep.
    #[arg(long)]
    max_outputs: Option<usize>,
    /// IoU threshold for suppression.
    #[arg(long)]
    iou_threshold: Option<f32>,
    /// Minimum score for a candidate box.
    #[arg(long)]
    score_threshold: Option<f32>,
    /// Suppress overlapping boxes per class instead of globally.
    #[arg(long)]
    per_class: bool,
    /// Enable tracing output for pipeline instrumentation.
    #[arg(long)]
    trace: bool,
}

/// Tensor dump a host writes after inference: both raw buffers plus the
/// shape metadata the model reported and the target canvas size.
#[derive(Debug, Deserialize)]
struct TensorDump {
    score_shape: Vec<usize>,
    scores: Vec<f32>,
    box_shape: Vec<usize>,
    boxes: Vec<f32>,
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    class_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    score: f32,
}

impl DetectionRecord {
    fn new(detection: &Detection, labels: Option<&[String]>) -> Self {
        let label = labels.and_then(|labels| {
            usize::try_from(detection.class_index)
                .ok()
                .and_then(|idx| labels.get(idx))
                .cloned()
        });
        Self {
            x: detection.bbox.x,
            y: detection.bbox.y,
            width: detection.bbox.width,
            height: detection.bbox.height,
            class_index: detection.class_index,
            label,
            score: detection.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detpost=info".parse()?))
            .with_target(false)
            .init();
    }

    let dump_text = fs::read_to_string(&cli.input)?;
    let dump: TensorDump = serde_json::from_str(&dump_text)?;
    let output = RawOutput::from_shaped(dump.scores, &dump.score_shape, dump.boxes, &dump.box_shape)?;

    let labels: Option<Vec<String>> = match &cli.labels {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };

    let defaults = PipelineConfig::default();
    let pipeline = Pipeline::with_config(PipelineConfig {
        max_outputs: cli.max_outputs.unwrap_or(defaults.max_outputs),
        iou_threshold: cli.iou_threshold.unwrap_or(defaults.iou_threshold),
        score_threshold: cli.score_threshold.unwrap_or(defaults.score_threshold),
        suppression: if cli.per_class {
            SuppressionMode::PerClass
        } else {
            SuppressionMode::ClassAgnostic
        },
        ..defaults
    })?;

    // The overlay image, when given, is the canvas: its dimensions override
    // the dump's advertised geometry, the same way a host would map onto
    // whatever it is about to draw on.
    let mut canvas = match &cli.overlay {
        Some(path) => Some(image::open(path)?.to_rgb8()),
        None => None,
    };
    let geometry = match &canvas {
        Some(img) => ImageGeometry {
            width: img.width(),
            height: img.height(),
        },
        None => ImageGeometry {
            width: dump.width,
            height: dump.height,
        },
    };

    let detections = pipeline.detect(&output, geometry)?;

    if let Some(img) = canvas.as_mut() {
        draw_detections(img, &detections, OverlayStyle::default());
        img.save(&cli.overlay_out)?;
    }

    let records: Vec<DetectionRecord> = detections
        .iter()
        .map(|d| DetectionRecord::new(d, labels.as_deref()))
        .collect();
    let rendered = serde_json::to_string_pretty(&Output {
        detections: records,
    })?;
    println!("{rendered}");

    Ok(())
}
