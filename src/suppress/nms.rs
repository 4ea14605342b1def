//! Greedy non-maximum suppression over decoded detections.

use std::cmp::Ordering;

use crate::detection::Detection;
use crate::suppress::iou::iou;
use crate::trace::{trace_event, trace_span};

/// Default overlap at or above which the lower-confidence box is dropped.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

/// Which detection pairs may suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmsMode {
    /// Any two overlapping boxes compete regardless of class.
    #[default]
    ClassAgnostic,
    /// Only boxes with the same class index compete.
    PerClass,
}

impl NmsMode {
    fn competes(self, a: &Detection, b: &Detection) -> bool {
        match self {
            NmsMode::ClassAgnostic => true,
            NmsMode::PerClass => a.class_index == b.class_index,
        }
    }
}

fn detection_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.element.cmp(&b.element))
        .then_with(|| a.class_index.cmp(&b.class_index))
}

/// Sorts detections by descending confidence with deterministic tie-breaking.
///
/// Ties fall back to element position, then class index; the sort is stable
/// for anything still equal.
pub fn sort_detections_desc(detections: &mut [Detection]) {
    detections.sort_by(detection_cmp_desc);
}

/// Applies greedy non-maximum suppression.
///
/// Repeatedly keeps the most confident remaining detection and discards every
/// remaining one whose IoU with it is `>= iou_threshold`. The result is
/// ordered by descending confidence. Empty and single-element inputs come back
/// unchanged.
pub fn non_max_suppression(
    mut detections: Vec<Detection>,
    iou_threshold: f32,
    mode: NmsMode,
) -> Vec<Detection> {
    let _span = trace_span!("nms", input = detections.len()).entered();

    sort_detections_desc(&mut detections);
    let total = detections.len();
    let mut suppressed = vec![false; total];
    for i in 0..total {
        if suppressed[i] {
            continue;
        }
        let kept = &detections[i];
        for j in (i + 1)..total {
            if suppressed[j] || !mode.competes(kept, &detections[j]) {
                continue;
            }
            if iou(kept, &detections[j]) >= iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    let out: Vec<Detection> = detections
        .into_iter()
        .zip(suppressed)
        .filter_map(|(det, dropped)| (!dropped).then_some(det))
        .collect();

    trace_event!("suppressed", kept = out.len(), dropped = total - out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::{non_max_suppression, NmsMode};
    use crate::detection::Detection;

    fn det(class_index: usize, confidence: f32, cx: f32, element: usize) -> Detection {
        Detection::from_center(class_index, "x", confidence, cx, 0.5, 0.2, 0.2, element).unwrap()
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(non_max_suppression(Vec::new(), 0.5, NmsMode::ClassAgnostic).is_empty());
    }

    #[test]
    fn overlapping_lower_confidence_box_is_dropped() {
        let dets = vec![det(0, 0.6, 0.5, 0), det(0, 0.9, 0.51, 1)];
        let out = non_max_suppression(dets, 0.5, NmsMode::ClassAgnostic);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].element, 1);
    }

    #[test]
    fn class_agnostic_suppresses_across_classes() {
        let dets = vec![det(0, 0.9, 0.5, 0), det(1, 0.8, 0.5, 1)];
        let out = non_max_suppression(dets, 0.5, NmsMode::ClassAgnostic);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_index, 0);
    }

    #[test]
    fn per_class_keeps_other_classes() {
        let dets = vec![det(0, 0.9, 0.5, 0), det(1, 0.8, 0.5, 1)];
        let out = non_max_suppression(dets, 0.5, NmsMode::PerClass);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn suppressed_box_does_not_suppress_others() {
        // b overlaps a and c; a does not overlap c. Only b is dropped.
        let a = det(0, 0.9, 0.3, 0);
        let b = det(0, 0.8, 0.34, 1);
        let c = det(0, 0.7, 0.38, 2);
        let out = non_max_suppression(vec![c, b, a], 0.5, NmsMode::ClassAgnostic);
        let elements: Vec<usize> = out.iter().map(|d| d.element).collect();
        assert_eq!(elements, vec![0, 2]);
    }
}
