//! Error types for yolopost.

use thiserror::Error;

/// Result alias for yolopost operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

/// Errors that can occur when setting up or driving the detection pipeline.
///
/// Individual malformed candidates are never reported here; the decoder
/// filters them silently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectError {
    /// The pipeline is missing a setup precondition (tensor shape or labels).
    #[error("detector not ready: {reason}")]
    NotReady { reason: &'static str },
    /// The tensor shape cannot hold box geometry plus at least one class.
    #[error("invalid tensor shape: {num_channel} channels x {num_elements} elements")]
    InvalidShape {
        num_channel: usize,
        num_elements: usize,
    },
    /// The flat buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A threshold is non-finite or outside `[0, 1]`.
    #[error("invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    /// An input or parameter is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Reading a label table failed.
    #[error("label io error: {reason}")]
    LabelIo { reason: String },
    /// Image decoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
