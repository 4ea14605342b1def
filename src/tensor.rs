//! Raw model output tensors.
//!
//! `RawOutput` is a borrowed, row-major view over the flat buffer produced by
//! the inference step. The logical shape is `[num_channel, num_elements]`:
//! channels `0..4` hold normalized box geometry (`cx`, `cy`, `w`, `h`) and
//! channels `4..num_channel` hold one score per class in label order. The
//! value for channel `j` at element `c` lives at `c + num_elements * j`, so
//! every channel is a contiguous row of `num_elements` values.

use crate::util::{DetectError, DetectResult};

/// Number of leading channels that carry box geometry.
pub const GEOMETRY_CHANNELS: usize = 4;

/// Borrowed channel-major view of one frame's model output.
#[derive(Copy, Clone, Debug)]
pub struct RawOutput<'a> {
    data: &'a [f32],
    num_channel: usize,
    num_elements: usize,
}

impl<'a> RawOutput<'a> {
    /// Creates a view over `data` with the given shape.
    ///
    /// The buffer may be longer than `num_channel * num_elements`; trailing
    /// values are ignored.
    pub fn new(data: &'a [f32], num_channel: usize, num_elements: usize) -> DetectResult<Self> {
        let needed = required_len(num_channel, num_elements)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            num_channel,
            num_elements,
        })
    }

    /// Returns the total channel count (geometry plus classes).
    pub fn num_channel(&self) -> usize {
        self.num_channel
    }

    /// Returns the number of candidate element positions.
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Returns the number of class score channels.
    pub fn num_classes(&self) -> usize {
        self.num_channel - GEOMETRY_CHANNELS
    }

    /// Returns the value at `(channel, element)` if it is within bounds.
    pub fn get(&self, channel: usize, element: usize) -> Option<f32> {
        if channel >= self.num_channel || element >= self.num_elements {
            return None;
        }
        let idx = channel.checked_mul(self.num_elements)?.checked_add(element)?;
        self.data.get(idx).copied()
    }

    /// Returns the contiguous row of values for `channel`.
    pub fn channel(&self, channel: usize) -> Option<&'a [f32]> {
        if channel >= self.num_channel {
            return None;
        }
        let start = channel.checked_mul(self.num_elements)?;
        let end = start.checked_add(self.num_elements)?;
        self.data.get(start..end)
    }

    /// Returns the in-shape portion of the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        &self.data[..self.num_channel * self.num_elements]
    }
}

/// Owned model output, used when a tensor is loaded rather than borrowed.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedOutput {
    data: Vec<f32>,
    num_channel: usize,
    num_elements: usize,
}

impl OwnedOutput {
    /// Takes ownership of `data` after validating it against the shape.
    pub fn new(data: Vec<f32>, num_channel: usize, num_elements: usize) -> DetectResult<Self> {
        RawOutput::new(&data, num_channel, num_elements)?;
        Ok(Self {
            data,
            num_channel,
            num_elements,
        })
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> RawOutput<'_> {
        RawOutput {
            data: &self.data,
            num_channel: self.num_channel,
            num_elements: self.num_elements,
        }
    }

    /// Returns the total channel count.
    pub fn num_channel(&self) -> usize {
        self.num_channel
    }

    /// Returns the number of candidate element positions.
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }
}

fn required_len(num_channel: usize, num_elements: usize) -> DetectResult<usize> {
    if num_channel <= GEOMETRY_CHANNELS || num_elements == 0 {
        return Err(DetectError::InvalidShape {
            num_channel,
            num_elements,
        });
    }
    num_channel
        .checked_mul(num_elements)
        .ok_or(DetectError::InvalidShape {
            num_channel,
            num_elements,
        })
}
