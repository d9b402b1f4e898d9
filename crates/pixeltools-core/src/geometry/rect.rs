//! Rectangles in display space and image sizes in source space.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance for containment checks on accumulated floating point math.
const EPSILON: f64 = 1e-6;

/// Errors raised by the geometry primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The display frame has zero, negative, or non-finite area.
    #[error("Display frame has no usable area")]
    InvalidFrame,

    /// A rectangle fell outside the frame or below the minimum size.
    #[error("Selection is degenerate or outside the display frame")]
    DegenerateSelection,
}

/// A pointer position in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Intrinsic size of a decoded image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// False until the image has been decoded and both dimensions are known.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// The on-screen rectangle occupied by the rendered image, relative to its
/// positioning container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayFrame {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn has_area(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn ensure_valid(&self) -> Result<(), GeometryError> {
        if self.has_area() {
            Ok(())
        } else {
            Err(GeometryError::InvalidFrame)
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right() && point.y >= self.top && point.y <= self.bottom()
    }

    /// The minimum selection size usable in this frame: `min_size`, shrunk
    /// to the frame when the frame itself is smaller.
    pub fn effective_min_size(&self, min_size: f64) -> f64 {
        min_size.max(0.0).min(self.width).min(self.height)
    }
}

/// The user-manipulated crop rectangle, in the same display space as
/// [`DisplayFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square selection centered in `frame`, with a side of `coverage`
    /// times the frame's shorter side (never below the effective minimum).
    pub fn centered(frame: &DisplayFrame, coverage: f64, min_size: f64) -> Self {
        let short_side = frame.width.min(frame.height);
        let min = frame.effective_min_size(min_size);
        let size = (short_side * coverage.clamp(0.0, 1.0)).clamp(min, short_side);
        Self {
            x: frame.left + (frame.width - size) / 2.0,
            y: frame.top + (frame.height - size) / 2.0,
            width: size,
            height: size,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check containment in `frame` and the minimum-size floor.
    pub fn validate(&self, frame: &DisplayFrame, min_size: f64) -> Result<(), GeometryError> {
        let min = frame.effective_min_size(min_size);
        let valid = self.is_finite()
            && self.width >= min - EPSILON
            && self.height >= min - EPSILON
            && self.x >= frame.left - EPSILON
            && self.y >= frame.top - EPSILON
            && self.right() <= frame.right() + EPSILON
            && self.bottom() <= frame.bottom() + EPSILON;
        if valid {
            Ok(())
        } else {
            Err(GeometryError::DegenerateSelection)
        }
    }

    /// Force the rect into `frame`: sizes are clamped to
    /// `[min, frame extent]` first, then the position is clamped.
    pub fn clamped_to(&self, frame: &DisplayFrame, min_size: f64) -> Self {
        if self.validate(frame, min_size).is_ok() {
            return *self;
        }
        let min = frame.effective_min_size(min_size);
        let width = clamp_or(self.width, min, frame.width);
        let height = clamp_or(self.height, min, frame.height);
        Self {
            x: clamp_or(self.x, frame.left, frame.right() - width),
            y: clamp_or(self.y, frame.top, frame.bottom() - height),
            width,
            height,
        }
    }

    /// Map this rect from one frame to another, preserving its relative
    /// position and size. Used when the viewport resizes.
    pub fn rescaled(&self, from: &DisplayFrame, to: &DisplayFrame, keep_square: bool) -> Self {
        let mut sx = to.width / from.width;
        let mut sy = to.height / from.height;
        if keep_square {
            let s = sx.min(sy);
            sx = s;
            sy = s;
        }
        let center = self.center();
        let cx = to.left + (center.x - from.left) * to.width / from.width;
        let cy = to.top + (center.y - from.top) * to.height / from.height;
        let width = self.width * sx;
        let height = self.height * sy;
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }
}

/// `value.clamp(lo, hi)` that tolerates `hi < lo` (resolves to `hi`) and
/// maps NaN to `lo`.
pub(crate) fn clamp_or(value: f64, lo: f64, hi: f64) -> f64 {
    let lo = lo.min(hi);
    if value.is_nan() {
        return lo;
    }
    value.clamp(lo, hi)
}
