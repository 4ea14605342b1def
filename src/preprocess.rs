//! Frame preparation for the inference step via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Frames are resized to
//! the model input size with nearest-neighbour sampling and normalized as
//! `(pixel - mean) / std` into an interleaved (NHWC) `f32` buffer.

use crate::util::{DetectError, DetectResult};
use image::imageops::FilterType;
use image::RgbImage;
use std::path::Path;

/// Model input geometry and normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSpec {
    pub width: u32,
    pub height: u32,
    pub mean: f32,
    pub std: f32,
}

impl InputSpec {
    /// Input of `width` x `height` scaled to `[0, 1]`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mean: 0.0,
            std: 255.0,
        }
    }

    /// Number of `f32` values in a prepared buffer.
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Resizes and normalizes an RGB frame into a model input buffer.
pub fn prepare_rgb(frame: &RgbImage, spec: &InputSpec) -> DetectResult<Vec<f32>> {
    if spec.width == 0 || spec.height == 0 {
        return Err(DetectError::InvalidInput("input size must be non-zero"));
    }
    if !spec.std.is_finite() || spec.std == 0.0 {
        return Err(DetectError::InvalidInput("std must be finite and non-zero"));
    }

    let resized;
    let src = if frame.dimensions() == (spec.width, spec.height) {
        frame
    } else {
        resized = image::imageops::resize(frame, spec.width, spec.height, FilterType::Nearest);
        &resized
    };

    let inv_std = 1.0 / spec.std;
    Ok(src
        .as_raw()
        .iter()
        .map(|&v| (v as f32 - spec.mean) * inv_std)
        .collect())
}

/// Loads an image from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> DetectResult<RgbImage> {
    let img = image::open(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}
