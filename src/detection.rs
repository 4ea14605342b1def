//! Detection value type and box geometry.

use crate::util::math::in_unit_interval;

/// One labeled bounding box decoded from a model output element.
///
/// Geometry is in normalized image coordinates. A `Detection` is only built
/// when all four corners lie in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Index into the label table.
    pub class_index: usize,
    /// Label resolved from `class_index`.
    pub class_name: String,
    /// Winning class score, strictly above the confidence threshold.
    pub confidence: f32,
    /// Box center x.
    pub cx: f32,
    /// Box center y.
    pub cy: f32,
    /// Box width as decoded.
    pub w: f32,
    /// Box height as decoded.
    pub h: f32,
    /// Left edge, `cx - w / 2`.
    pub x1: f32,
    /// Top edge, `cy - h / 2`.
    pub y1: f32,
    /// Right edge, `cx + w / 2`.
    pub x2: f32,
    /// Bottom edge, `cy + h / 2`.
    pub y2: f32,
    /// Element position in the model output this detection came from.
    pub element: usize,
}

impl Detection {
    /// Builds a detection from center/size geometry, returning `None` when any
    /// derived corner falls outside the unit square.
    #[allow(clippy::too_many_arguments)]
    pub fn from_center(
        class_index: usize,
        class_name: impl Into<String>,
        confidence: f32,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        element: usize,
    ) -> Option<Self> {
        let x1 = cx - w / 2.0;
        let y1 = cy - h / 2.0;
        let x2 = cx + w / 2.0;
        let y2 = cy + h / 2.0;
        if !corners_in_unit_square(x1, y1, x2, y2) {
            return None;
        }
        Some(Self {
            class_index,
            class_name: class_name.into(),
            confidence,
            cx,
            cy,
            w,
            h,
            x1,
            y1,
            x2,
            y2,
            element,
        })
    }

    /// Returns the corners as `[x1, y1, x2, y2]`.
    pub fn corners(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Nominal box area from the decoded size.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Scales the corners to a `width` x `height` pixel frame.
    pub fn to_pixel_rect(&self, width: f32, height: f32) -> PixelRect {
        PixelRect {
            left: self.x1 * width,
            top: self.y1 * height,
            right: self.x2 * width,
            bottom: self.y2 * height,
        }
    }
}

/// Axis-aligned rectangle in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

fn corners_in_unit_square(x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
    in_unit_interval(x1) && in_unit_interval(y1) && in_unit_interval(x2) && in_unit_interval(y2)
}
