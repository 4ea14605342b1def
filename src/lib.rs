//! yolopost turns raw YOLO-style detector output into labeled boxes.
//!
//! The crate covers the numeric tail of a detection pipeline: decoding a
//! channel-major `[4 + classes, elements]` output tensor into candidates,
//! filtering them by confidence and geometry, and pruning overlaps with greedy
//! non-maximum suppression. Model execution stays with the caller.
//!
//! ```
//! use yolopost::{decode_and_suppress, LabelTable, Outcome};
//!
//! let labels = LabelTable::new(["cat", "dog"]);
//! let raw = [0.5f32, 0.5, 0.2, 0.2, 0.9, 0.1];
//! let outcome = decode_and_suppress(&raw, 6, 1, &labels, 0.55, 0.5).unwrap();
//! match outcome {
//!     Outcome::Detections { detections, .. } => assert_eq!(detections[0].class_name, "cat"),
//!     Outcome::NoDetections => unreachable!(),
//! }
//! ```

pub mod decode;
pub mod detection;
pub mod labels;
pub mod pipeline;
#[cfg(feature = "image-io")]
pub mod preprocess;
pub mod selection;
pub mod suppress;
pub mod tensor;
mod trace;
pub mod util;

pub use decode::{decode_candidates, DEFAULT_CONFIDENCE_THRESHOLD};
pub use detection::{Detection, PixelRect};
pub use labels::LabelTable;
pub use pipeline::{decode_and_suppress, Detector, DetectorConfig, Outcome};
pub use selection::ClassSelection;
pub use suppress::{iou, non_max_suppression, NmsMode, DEFAULT_IOU_THRESHOLD};
pub use tensor::{OwnedOutput, RawOutput};
pub use util::{DetectError, DetectResult};
