//! Candidate decoding from a raw model output.
//!
//! Each element position is evaluated independently: pick the best class
//! score, keep it if it clears the confidence threshold and names a known
//! label, then derive the box and drop it if any corner leaves the unit
//! square. Rejected candidates are skipped, never reported as errors.

use crate::detection::Detection;
use crate::labels::LabelTable;
use crate::tensor::{RawOutput, GEOMETRY_CHANNELS};
use crate::trace::{trace_event, trace_span};

/// Default minimum class score; a candidate must score strictly above it.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.55;

/// Returns the best `(class_index, score)` at `element`.
///
/// Classes are scanned in increasing order with a strict `>` comparison, so
/// the lowest class index wins exact ties. NaN scores never win. Returns
/// `None` when no class has a comparable score.
pub(crate) fn argmax_class(output: RawOutput<'_>, element: usize) -> Option<(usize, f32)> {
    let data = output.as_slice();
    let stride = output.num_elements();
    let mut best: Option<(usize, f32)> = None;
    let mut idx = element + stride * GEOMETRY_CHANNELS;
    for class_index in 0..output.num_classes() {
        let score = data[idx];
        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => !score.is_nan(),
        };
        if better {
            best = Some((class_index, score));
        }
        idx += stride;
    }
    best
}

/// Decodes every element of `output` into geometry-valid candidates.
///
/// Candidates come back in element order and are not yet suppressed. An empty
/// result means no element cleared `confidence_threshold`.
pub fn decode_candidates(
    output: RawOutput<'_>,
    labels: &LabelTable,
    confidence_threshold: f32,
) -> Vec<Detection> {
    let _span = trace_span!(
        "decode",
        channels = output.num_channel(),
        elements = output.num_elements()
    )
    .entered();

    let data = output.as_slice();
    let n = output.num_elements();
    let mut out = Vec::new();
    for element in 0..n {
        let Some((class_index, score)) = argmax_class(output, element) else {
            continue;
        };
        if score <= confidence_threshold {
            continue;
        }
        let Some(class_name) = labels.get(class_index) else {
            continue;
        };

        let cx = data[element];
        let cy = data[element + n];
        let w = data[element + 2 * n];
        let h = data[element + 3 * n];
        if let Some(det) =
            Detection::from_center(class_index, class_name, score, cx, cy, w, h, element)
        {
            out.push(det);
        }
    }

    trace_event!("decoded_candidates", count = out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::{argmax_class, decode_candidates};
    use crate::labels::LabelTable;
    use crate::tensor::RawOutput;

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        // 4 geometry channels + 3 classes, one element.
        let data = [0.5f32, 0.5, 0.1, 0.1, 0.7, 0.7, 0.2];
        let view = RawOutput::new(&data, 7, 1).unwrap();
        assert_eq!(argmax_class(view, 0), Some((0, 0.7)));
    }

    #[test]
    fn argmax_skips_nan_scores() {
        let data = [0.5f32, 0.5, 0.1, 0.1, f32::NAN, 0.3];
        let view = RawOutput::new(&data, 6, 1).unwrap();
        assert_eq!(argmax_class(view, 0), Some((1, 0.3)));
    }

    #[test]
    fn class_past_label_table_is_dropped() {
        let data = [0.5f32, 0.5, 0.2, 0.2, 0.1, 0.9];
        let view = RawOutput::new(&data, 6, 1).unwrap();
        let labels = LabelTable::new(["only"]);
        assert!(decode_candidates(view, &labels, 0.55).is_empty());
    }

    #[test]
    fn candidates_keep_element_order() {
        // Two elements, channel-major layout.
        #[rustfmt::skip]
        let data = [
            0.3f32, 0.7, // cx
            0.3, 0.7, // cy
            0.2, 0.2, // w
            0.2, 0.2, // h
            0.6, 0.1, // class a
            0.1, 0.9, // class b
        ];
        let view = RawOutput::new(&data, 6, 2).unwrap();
        let labels = LabelTable::new(["a", "b"]);
        let dets = decode_candidates(view, &labels, 0.55);
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].element, 0);
        assert_eq!(dets[0].class_name, "a");
        assert_eq!(dets[1].element, 1);
        assert_eq!(dets[1].class_name, "b");
    }
}
