//! Overlap measurement and greedy non-maximum suppression.

pub mod iou;
pub mod nms;

pub use iou::iou;
pub use nms::{non_max_suppression, sort_detections_desc, NmsMode, DEFAULT_IOU_THRESHOLD};
