//! Python bindings for yolopost.
//!
//! Exposes the per-frame decode and suppression pipeline to Python via PyO3.
//! Model outputs are passed as 2D `float32` numpy arrays shaped
//! `(num_channel, num_elements)`.

use numpy::{PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use yolopost::{
    DetectError, Detection as RustDetection, Detector as RustDetector,
    DetectorConfig as RustDetectorConfig, LabelTable, NmsMode, Outcome,
};

/// Convert a DetectError to a Python exception.
fn to_py_err(err: DetectError) -> PyErr {
    match err {
        DetectError::NotReady { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_nms_mode(mode: &str) -> PyResult<NmsMode> {
    match mode.to_lowercase().as_str() {
        "class_agnostic" => Ok(NmsMode::ClassAgnostic),
        "per_class" => Ok(NmsMode::PerClass),
        _ => Err(PyValueError::new_err(
            "nms_mode must be 'class_agnostic' or 'per_class'",
        )),
    }
}

/// A labeled bounding box in normalized image coordinates.
#[pyclass]
#[derive(Clone)]
pub struct Detection {
    #[pyo3(get)]
    pub class_index: usize,
    #[pyo3(get)]
    pub class_name: String,
    #[pyo3(get)]
    pub confidence: f32,
    #[pyo3(get)]
    pub cx: f32,
    #[pyo3(get)]
    pub cy: f32,
    #[pyo3(get)]
    pub w: f32,
    #[pyo3(get)]
    pub h: f32,
    #[pyo3(get)]
    pub x1: f32,
    #[pyo3(get)]
    pub y1: f32,
    #[pyo3(get)]
    pub x2: f32,
    #[pyo3(get)]
    pub y2: f32,
}

#[pymethods]
impl Detection {
    /// Corners scaled to a pixel frame as (left, top, right, bottom).
    fn to_pixel_rect(&self, width: f32, height: f32) -> (f32, f32, f32, f32) {
        (
            self.x1 * width,
            self.y1 * height,
            self.x2 * width,
            self.y2 * height,
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "Detection(class_name='{}', confidence={:.3}, box=({:.3}, {:.3}, {:.3}, {:.3}))",
            self.class_name, self.confidence, self.x1, self.y1, self.x2, self.y2
        )
    }
}

impl From<RustDetection> for Detection {
    fn from(d: RustDetection) -> Self {
        Self {
            class_index: d.class_index,
            class_name: d.class_name,
            confidence: d.confidence,
            cx: d.cx,
            cy: d.cy,
            w: d.w,
            h: d.h,
            x1: d.x1,
            y1: d.y1,
            x2: d.x2,
            y2: d.y2,
        }
    }
}

/// Thresholds and suppression mode.
#[pyclass]
#[derive(Clone)]
pub struct DetectorConfig {
    inner: RustDetectorConfig,
}

#[pymethods]
impl DetectorConfig {
    /// Create a new DetectorConfig.
    ///
    /// Args:
    ///     confidence_threshold: Class scores must exceed this (default: 0.55)
    ///     iou_threshold: Overlap at which boxes are suppressed (default: 0.5)
    ///     nms_mode: "class_agnostic" or "per_class" (default: "class_agnostic")
    ///     max_detections: Optional cap on returned boxes (default: None)
    #[new]
    #[pyo3(signature = (
        confidence_threshold = 0.55,
        iou_threshold = 0.5,
        nms_mode = "class_agnostic",
        max_detections = None
    ))]
    fn new(
        confidence_threshold: f32,
        iou_threshold: f32,
        nms_mode: &str,
        max_detections: Option<usize>,
    ) -> PyResult<Self> {
        let inner = RustDetectorConfig {
            confidence_threshold,
            iou_threshold,
            nms_mode: parse_nms_mode(nms_mode)?,
            max_detections,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        let mode = match self.inner.nms_mode {
            NmsMode::ClassAgnostic => "class_agnostic",
            NmsMode::PerClass => "per_class",
        };
        format!(
            "DetectorConfig(confidence_threshold={}, iou_threshold={}, nms_mode='{}', max_detections={:?})",
            self.inner.confidence_threshold, self.inner.iou_threshold, mode, self.inner.max_detections
        )
    }
}

/// Per-frame detector bound to a tensor shape and label table.
#[pyclass]
pub struct Detector {
    inner: RustDetector,
}

#[pymethods]
impl Detector {
    /// Create a detector.
    ///
    /// Args:
    ///     num_channel: Output channels (4 box channels + one per class)
    ///     num_elements: Candidate positions per frame
    ///     labels: Class names in class order
    ///     config: DetectorConfig (default: DetectorConfig())
    #[new]
    #[pyo3(signature = (num_channel, num_elements, labels, config = None))]
    fn new(
        num_channel: usize,
        num_elements: usize,
        labels: Vec<String>,
        config: Option<DetectorConfig>,
    ) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        cfg.validate().map_err(to_py_err)?;
        let inner = RustDetector::new()
            .with_shape(num_channel, num_elements)
            .with_labels(LabelTable::new(labels))
            .with_config(cfg);
        Ok(Self { inner })
    }

    /// Decode and suppress one frame.
    ///
    /// Args:
    ///     output: 2D float32 numpy array (num_channel x num_elements)
    ///
    /// Returns:
    ///     None when nothing was detected, otherwise a list of Detection
    ///     objects sorted by confidence (best first)
    fn process(&self, output: PyReadonlyArray2<'_, f32>) -> PyResult<Option<Vec<Detection>>> {
        let shape = output.shape();
        let (num_channel, num_elements) = self.inner.shape();
        if shape[0] != num_channel || shape[1] != num_elements {
            return Err(PyValueError::new_err(format!(
                "expected output shape ({num_channel}, {num_elements}), got ({}, {})",
                shape[0], shape[1]
            )));
        }
        let data = output.as_slice()?;
        let outcome = self.inner.process(data).map_err(to_py_err)?;
        Ok(into_py_detections(outcome))
    }

    fn __repr__(&self) -> String {
        let (num_channel, num_elements) = self.inner.shape();
        format!(
            "Detector(shape=({}, {}), labels={})",
            num_channel,
            num_elements,
            self.inner.labels().len()
        )
    }
}

fn into_py_detections(outcome: Outcome) -> Option<Vec<Detection>> {
    match outcome {
        Outcome::NoDetections => None,
        Outcome::Detections { detections, .. } => {
            Some(detections.into_iter().map(Detection::from).collect())
        }
    }
}

/// Decode and suppress a single model output.
///
/// Args:
///     output: 2D float32 numpy array (num_channel x num_elements)
///     labels: Class names in class order
///     confidence_threshold: Class scores must exceed this (default: 0.55)
///     iou_threshold: Overlap at which boxes are suppressed (default: 0.5)
///
/// Returns:
///     None when nothing was detected, otherwise a list of Detection objects
#[pyfunction]
#[pyo3(signature = (output, labels, confidence_threshold = 0.55, iou_threshold = 0.5))]
fn decode_and_suppress(
    output: PyReadonlyArray2<'_, f32>,
    labels: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
) -> PyResult<Option<Vec<Detection>>> {
    let shape = output.shape();
    let num_channel = shape[0];
    let num_elements = shape[1];
    let data = output.as_slice()?;
    let labels = LabelTable::new(labels);

    let outcome = yolopost::decode_and_suppress(
        data,
        num_channel,
        num_elements,
        &labels,
        confidence_threshold,
        iou_threshold,
    )
    .map_err(to_py_err)?;
    Ok(into_py_detections(outcome))
}

/// Python module for yolopost.
#[pymodule]
fn _yolopost(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Detection>()?;
    m.add_class::<DetectorConfig>()?;
    m.add_class::<Detector>()?;
    m.add_function(wrap_pyfunction!(decode_and_suppress, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
