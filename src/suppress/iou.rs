//! Intersection-over-union between two detections.

use crate::detection::Detection;
use crate::util::math::safe_ratio;

/// Computes the IoU of two detections.
///
/// The intersection comes from the corner rectangles while each box area uses
/// the decoded `w * h`. Two zero-area boxes give `0.0` rather than NaN.
pub fn iou(a: &Detection, b: &Detection) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let union = a.area() + b.area() - intersection;
    safe_ratio(intersection, union)
}
