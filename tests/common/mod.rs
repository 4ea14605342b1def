//! Shared helpers for building channel-major output tensors.

#![allow(dead_code)]

/// Packs per-element columns `[cx, cy, w, h, score_0, .., score_k]` into the
/// channel-major layout a detector emits. Returns `(buffer, channels, elements)`.
pub fn pack_columns(columns: &[Vec<f32>]) -> (Vec<f32>, usize, usize) {
    let num_elements = columns.len();
    let num_channel = columns.first().map_or(0, Vec::len);
    let mut data = vec![0.0f32; num_channel * num_elements];
    for (c, column) in columns.iter().enumerate() {
        assert_eq!(column.len(), num_channel, "ragged column {c}");
        for (j, value) in column.iter().enumerate() {
            data[c + num_elements * j] = *value;
        }
    }
    (data, num_channel, num_elements)
}

/// One element column with a single box and the given class scores.
pub fn column(cx: f32, cy: f32, w: f32, h: f32, scores: &[f32]) -> Vec<f32> {
    let mut col = vec![cx, cy, w, h];
    col.extend_from_slice(scores);
    col
}
