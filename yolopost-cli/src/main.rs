use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolopost::{Detection, Detector, DetectorConfig, LabelTable, NmsMode, Outcome, OwnedOutput};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "yolopost CLI: decode and suppress a dumped model output")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the decode and suppression stages.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NmsModeConfig {
    ClassAgnostic,
    PerClass,
}

impl From<NmsModeConfig> for NmsMode {
    fn from(value: NmsModeConfig) -> Self {
        match value {
            NmsModeConfig::ClassAgnostic => NmsMode::ClassAgnostic,
            NmsModeConfig::PerClass => NmsMode::PerClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectorConfigJson {
    confidence_threshold: f32,
    iou_threshold: f32,
    nms_mode: NmsModeConfig,
    max_detections: Option<usize>,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            nms_mode: NmsModeConfig::ClassAgnostic,
            max_detections: cfg.max_detections,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        Self {
            confidence_threshold: value.confidence_threshold,
            iou_threshold: value.iou_threshold,
            nms_mode: value.nms_mode.into(),
            max_detections: value.max_detections,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    labels_path: Option<String>,
    labels: Vec<String>,
    output_path: Option<String>,
    frame_width: Option<f32>,
    frame_height: Option<f32>,
    detector: DetectorConfigJson,
}

/// One frame of model output as dumped by the inference side.
#[derive(Debug, Deserialize)]
struct TensorFile {
    num_channel: usize,
    num_elements: usize,
    data: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_index: usize,
    class_name: String,
    confidence: f32,
    corners: [f32; 4],
    center: [f32; 2],
    size: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pixel_rect: Option<[f32; 4]>,
}

impl DetectionRecord {
    fn new(det: &Detection, frame: Option<(f32, f32)>) -> Self {
        let pixel_rect = frame.map(|(width, height)| {
            let rect = det.to_pixel_rect(width, height);
            [rect.left, rect.top, rect.right, rect.bottom]
        });
        Self {
            class_index: det.class_index,
            class_name: det.class_name.clone(),
            confidence: det.confidence,
            corners: det.corners(),
            center: [det.cx, det.cy],
            size: [det.w, det.h],
            pixel_rect,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Detections,
    NoDetections,
}

#[derive(Debug, Serialize)]
struct Output {
    status: Status,
    elapsed_ms: Option<f64>,
    detections: Vec<DetectionRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("yolopost=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let labels = match &config.labels_path {
        Some(path) => LabelTable::load(path)?,
        None => LabelTable::new(config.labels.iter().cloned()),
    };
    if labels.is_empty() {
        return Err("labels_path or labels must provide at least one label".into());
    }

    let tensor_text = fs::read_to_string(&config.tensor_path)?;
    let tensor: TensorFile = serde_json::from_str(&tensor_text)?;
    let output = OwnedOutput::new(tensor.data, tensor.num_channel, tensor.num_elements)?;

    let detector_cfg: DetectorConfig = config.detector.into();
    detector_cfg.validate()?;
    let detector = Detector::new()
        .with_shape(output.num_channel(), output.num_elements())
        .with_labels(labels)
        .with_config(detector_cfg);

    let frame = config.frame_width.zip(config.frame_height);
    let outcome = detector.process(output.view().as_slice())?;
    let result = match &outcome {
        Outcome::NoDetections => Output {
            status: Status::NoDetections,
            elapsed_ms: None,
            detections: Vec::new(),
        },
        Outcome::Detections {
            detections,
            elapsed,
        } => Output {
            status: Status::Detections,
            elapsed_ms: Some(elapsed.as_secs_f64() * 1000.0),
            detections: detections
                .iter()
                .map(|det| DetectionRecord::new(det, frame))
                .collect(),
        },
    };
    let json = serde_json::to_string_pretty(&result)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
