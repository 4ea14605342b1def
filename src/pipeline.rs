//! Per-frame detection pipeline: decode, suppress, and time the result.
//!
//! A [`Detector`] holds the tensor shape and label table supplied by the
//! inference side plus a [`DetectorConfig`]. It keeps no per-frame state, so
//! one instance can process frames back to back from a worker thread.

use std::time::{Duration, Instant};

use crate::decode::{decode_candidates, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::detection::Detection;
use crate::labels::LabelTable;
use crate::suppress::{non_max_suppression, NmsMode, DEFAULT_IOU_THRESHOLD};
use crate::tensor::RawOutput;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetectError, DetectResult};

/// Tunable knobs for decoding and suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Class scores must be strictly greater than this to be kept.
    pub confidence_threshold: f32,
    /// Boxes overlapping a kept box with IoU `>=` this are dropped.
    pub iou_threshold: f32,
    /// Whether suppression crosses class boundaries.
    pub nms_mode: NmsMode,
    /// Upper bound on returned detections (`None` for unlimited).
    pub max_detections: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            nms_mode: NmsMode::ClassAgnostic,
            max_detections: None,
        }
    }
}

impl DetectorConfig {
    /// Checks that thresholds are usable.
    ///
    /// `confidence_threshold` must lie in `[0, 1]`; `iou_threshold` in
    /// `(0, 1]` so disjoint boxes never suppress each other.
    pub fn validate(&self) -> DetectResult<()> {
        let conf = self.confidence_threshold;
        if !(0.0..=1.0).contains(&conf) {
            return Err(DetectError::InvalidThreshold {
                name: "confidence_threshold",
                value: conf,
            });
        }
        let iou = self.iou_threshold;
        if !(iou > 0.0 && iou <= 1.0) {
            return Err(DetectError::InvalidThreshold {
                name: "iou_threshold",
                value: iou,
            });
        }
        if self.max_detections == Some(0) {
            return Err(DetectError::InvalidThreshold {
                name: "max_detections",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Result of processing one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The decoder produced no candidates.
    NoDetections,
    /// Suppressed detections, most confident first, with decode+suppress time.
    Detections {
        detections: Vec<Detection>,
        elapsed: Duration,
    },
}

impl Outcome {
    /// Returns the detections, empty for [`Outcome::NoDetections`].
    pub fn detections(&self) -> &[Detection] {
        match self {
            Outcome::NoDetections => &[],
            Outcome::Detections { detections, .. } => detections,
        }
    }

    /// Returns the most confident detection, if any.
    pub fn best(&self) -> Option<&Detection> {
        self.detections().first()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::NoDetections)
    }

    /// Returns the processing time, if the frame produced detections.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Outcome::NoDetections => None,
            Outcome::Detections { elapsed, .. } => Some(*elapsed),
        }
    }

    /// Returns the processing time in whole milliseconds.
    pub fn elapsed_millis(&self) -> Option<u64> {
        self.elapsed()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Stateless per-frame detector.
#[derive(Clone, Debug, Default)]
pub struct Detector {
    num_channel: usize,
    num_elements: usize,
    labels: LabelTable,
    cfg: DetectorConfig,
}

impl Detector {
    /// Creates a detector with no shape or labels; it refuses frames until
    /// both are set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a detector using `cfg`.
    pub fn with_config(mut self, cfg: DetectorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns a detector expecting `[num_channel, num_elements]` outputs.
    pub fn with_shape(mut self, num_channel: usize, num_elements: usize) -> Self {
        self.set_shape(num_channel, num_elements);
        self
    }

    /// Returns a detector resolving class ids through `labels`.
    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    /// Records the output tensor shape reported by the inference engine.
    pub fn set_shape(&mut self, num_channel: usize, num_elements: usize) {
        self.num_channel = num_channel;
        self.num_elements = num_elements;
    }

    pub fn set_labels(&mut self, labels: LabelTable) {
        self.labels = labels;
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Returns `(num_channel, num_elements)`; zero means unset.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_channel, self.num_elements)
    }

    /// Returns `true` once shape and labels are both set.
    pub fn is_ready(&self) -> bool {
        self.check_ready().is_ok()
    }

    fn check_ready(&self) -> DetectResult<()> {
        check_setup(self.num_channel, self.num_elements, &self.labels)
    }

    /// Decodes and suppresses one frame's flat output buffer.
    ///
    /// Fails only on setup problems (shape or labels missing, invalid
    /// config, buffer shorter than the shape). Malformed candidates are
    /// filtered, and a frame with no surviving candidates yields
    /// [`Outcome::NoDetections`].
    pub fn process(&self, buffer: &[f32]) -> DetectResult<Outcome> {
        self.check_ready()?;
        self.cfg.validate()?;
        let output = RawOutput::new(buffer, self.num_channel, self.num_elements)?;
        Ok(run_frame(output, &self.labels, &self.cfg))
    }
}

fn run_frame(output: RawOutput<'_>, labels: &LabelTable, cfg: &DetectorConfig) -> Outcome {
    let _span = trace_span!("process_frame").entered();
    let start = Instant::now();

    let candidates = decode_candidates(output, labels, cfg.confidence_threshold);
    if candidates.is_empty() {
        trace_event!("no_detections");
        return Outcome::NoDetections;
    }

    let mut detections = non_max_suppression(candidates, cfg.iou_threshold, cfg.nms_mode);
    if let Some(limit) = cfg.max_detections {
        detections.truncate(limit);
    }
    let elapsed = start.elapsed();

    trace_event!(
        "frame_processed",
        count = detections.len(),
        elapsed_us = elapsed.as_micros() as u64
    );
    Outcome::Detections {
        detections,
        elapsed,
    }
}

fn check_setup(num_channel: usize, num_elements: usize, labels: &LabelTable) -> DetectResult<()> {
    if num_channel == 0 || num_elements == 0 {
        return Err(DetectError::NotReady {
            reason: "tensor shape not set",
        });
    }
    if labels.is_empty() {
        return Err(DetectError::NotReady {
            reason: "label table is empty",
        });
    }
    Ok(())
}

/// One-shot decode and suppression with class-agnostic suppression.
///
/// `num_channel` or `num_elements` of zero, or an empty label table, is
/// reported as [`DetectError::NotReady`].
pub fn decode_and_suppress(
    raw: &[f32],
    num_channel: usize,
    num_elements: usize,
    labels: &LabelTable,
    confidence_threshold: f32,
    iou_threshold: f32,
) -> DetectResult<Outcome> {
    check_setup(num_channel, num_elements, labels)?;
    let cfg = DetectorConfig {
        confidence_threshold,
        iou_threshold,
        ..DetectorConfig::default()
    };
    cfg.validate()?;
    let output = RawOutput::new(raw, num_channel, num_elements)?;
    Ok(run_frame(output, labels, &cfg))
}
