//! Mapping display-space selections into source pixel space.
//!
//! The display never rotates the source while the user selects, so the
//! selection is first scaled into the image's stored orientation. Its center
//! is then carried into the space of a canvas that already holds the rotated
//! image, and the crop is read from there. For 90/270 both the canvas and
//! the selection extents swap.
//!
//! For a stored image of size `ow x oh`, a stored-space point `(cx, cy)` maps to:
//! ```text
//!   0°: (cx,      cy)
//!  90°: (oh - cy, cx)
//! 180°: (ow - cx, oh - cy)
//! 270°: (cy,      ow - cx)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Rotation;
use crate::geometry::{DisplayFrame, ImageSize, Point, SelectionRect};

/// Errors from coordinate mapping and buffer region access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Natural dimensions are not known yet; retry after the load completes.
    #[error("Image is not ready: natural size is unknown")]
    ImageNotReady,

    /// The display frame has no usable area.
    #[error("Display frame has no usable area")]
    InvalidFrame,

    /// A pixel region does not fit inside the buffer it is read from.
    #[error("Region {width}x{height} at ({x}, {y}) is outside the {buffer_width}x{buffer_height} buffer")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },

    /// A display point does not fall on the rendered image.
    #[error("Point ({x:.1}, {y:.1}) is outside the displayed image")]
    PointOutsideFrame { x: f64, y: f64 },
}

/// A rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Map a stored-orientation point into the rotated canvas for an image of
/// (pre-rotation) size `size`.
///
/// Applying this for `r` and then for `r.inverse()` with the rotated size
/// returns the original point.
pub fn rotate_point(point: Point, size: ImageSize, rotation: Rotation) -> Point {
    let ow = f64::from(size.width);
    let oh = f64::from(size.height);
    let Point { x: cx, y: cy } = point;

    match rotation {
        Rotation::Deg0 => Point::new(cx, cy),
        Rotation::Deg90 => Point::new(oh - cy, cx),
        Rotation::Deg180 => Point::new(ow - cx, oh - cy),
        Rotation::Deg270 => Point::new(cy, ow - cx),
    }
}

/// Per-axis factors from display pixels to natural pixels.
fn scale_factors(frame: &DisplayFrame, natural: ImageSize) -> Result<(f64, f64), TransformError> {
    if !natural.is_ready() {
        return Err(TransformError::ImageNotReady);
    }
    if !frame.has_area() {
        return Err(TransformError::InvalidFrame);
    }
    Ok((
        f64::from(natural.width) / frame.width,
        f64::from(natural.height) / frame.height,
    ))
}

/// Compute the rectangle to read from the rotated source canvas for a
/// display-space selection.
///
/// # Errors
///
/// - `ImageNotReady` when either natural dimension is zero
/// - `InvalidFrame` when the frame has no area
pub fn remap_selection(
    selection: &SelectionRect,
    frame: &DisplayFrame,
    natural: ImageSize,
    rotation: Rotation,
) -> Result<SourceRect, TransformError> {
    let (scale_x, scale_y) = scale_factors(frame, natural)?;

    let sx = (selection.x - frame.left) * scale_x;
    let sy = (selection.y - frame.top) * scale_y;
    let sw = selection.width * scale_x;
    let sh = selection.height * scale_y;

    let (rw, rh) = if rotation.swaps_dimensions() { (sh, sw) } else { (sw, sh) };
    let rotated = rotation.rotated_size(natural);
    let width = round_extent(rw, rotated.width);
    let height = round_extent(rh, rotated.height);

    let center = rotate_point(Point::new(sx + sw / 2.0, sy + sh / 2.0), natural, rotation);
    let x = round_origin(center.x - f64::from(width) / 2.0, rotated.width - width);
    let y = round_origin(center.y - f64::from(height) / 2.0, rotated.height - height);

    let rect = SourceRect::new(x, y, width, height);
    log::debug!("remapped {selection:?} at {}° to {rect:?}", rotation.degrees());
    Ok(rect)
}

/// Map a display point to the natural pixel under it.
///
/// # Errors
///
/// `PointOutsideFrame` when the point is not over the rendered image, plus
/// the errors of [`remap_selection`].
pub fn display_to_source(
    point: Point,
    frame: &DisplayFrame,
    natural: ImageSize,
) -> Result<(u32, u32), TransformError> {
    let (scale_x, scale_y) = scale_factors(frame, natural)?;
    if !point.is_finite() || !frame.contains(point) {
        return Err(TransformError::PointOutsideFrame {
            x: point.x,
            y: point.y,
        });
    }

    let x = ((point.x - frame.left) * scale_x).floor() as u32;
    let y = ((point.y - frame.top) * scale_y).floor() as u32;
    Ok((x.min(natural.width - 1), y.min(natural.height - 1)))
}

/// Round a scaled extent to whole pixels in `[1, limit]`.
fn round_extent(value: f64, limit: u32) -> u32 {
    if !value.is_finite() {
        return limit;
    }
    (value.round().max(1.0) as u32).min(limit)
}

/// Round an origin and clamp it to `[0, max]`.
fn round_origin(value: f64, max: u32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DisplayFrame {
        DisplayFrame::new(0.0, 0.0, 400.0, 300.0)
    }

    const NATURAL: ImageSize = ImageSize::new(800, 600);

    #[test]
    fn test_unrotated_selection_scales() {
        let selection = SelectionRect::new(100.0, 50.0, 100.0, 100.0);
        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg0).unwrap();
        assert_eq!(rect, SourceRect::new(200, 100, 200, 200));
    }

    #[test]
    fn test_rotated_center_at_90() {
        // Centered at display (200, 150) -> stored (400, 300)
        let center = rotate_point(Point::new(400.0, 300.0), NATURAL, Rotation::Deg90);
        assert_eq!(center, Point::new(300.0, 400.0));

        let selection = SelectionRect::new(175.0, 125.0, 50.0, 50.0);
        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg90).unwrap();
        assert_eq!(rect, SourceRect::new(250, 350, 100, 100));
    }

    #[test]
    fn test_rotated_centers_at_180_and_270() {
        let p = Point::new(100.0, 50.0);
        assert_eq!(rotate_point(p, NATURAL, Rotation::Deg180), Point::new(700.0, 550.0));
        assert_eq!(rotate_point(p, NATURAL, Rotation::Deg270), Point::new(50.0, 700.0));
    }

    #[test]
    fn test_frame_offset_is_removed() {
        let frame = DisplayFrame::new(30.0, 20.0, 400.0, 300.0);
        let selection = SelectionRect::new(130.0, 70.0, 100.0, 100.0);
        let rect = remap_selection(&selection, &frame, NATURAL, Rotation::Deg0).unwrap();
        assert_eq!(rect, SourceRect::new(200, 100, 200, 200));
    }

    #[test]
    fn test_remap_clamps_into_rotated_canvas() {
        // Bottom-right corner selection: after a 90° turn the canvas is 600x800.
        let selection = SelectionRect::new(250.0, 150.0, 150.0, 150.0);
        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg90).unwrap();
        assert!(rect.fits_within(600, 800));
        assert_eq!(rect, SourceRect::new(0, 500, 300, 300));
    }

    #[test]
    fn test_non_square_selection_swaps_extents() {
        // Stored region (0, 0, 200, 100).
        let selection = SelectionRect::new(0.0, 0.0, 100.0, 50.0);

        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg90).unwrap();
        assert_eq!(rect, SourceRect::new(500, 0, 100, 200));

        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg270).unwrap();
        assert_eq!(rect, SourceRect::new(0, 600, 100, 200));

        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg180).unwrap();
        assert_eq!(rect, SourceRect::new(600, 500, 200, 100));
    }

    #[test]
    fn test_full_width_selection_becomes_full_height() {
        // Full-width strip on a landscape image rotated to portrait.
        let selection = SelectionRect::new(0.0, 0.0, 400.0, 100.0);
        let rect = remap_selection(&selection, &frame(), NATURAL, Rotation::Deg90).unwrap();
        assert_eq!(rect, SourceRect::new(400, 0, 200, 800));
        assert!(rect.fits_within(600, 800));
    }

    #[test]
    fn test_image_not_ready() {
        let selection = SelectionRect::new(0.0, 0.0, 50.0, 50.0);
        let result = remap_selection(&selection, &frame(), ImageSize::new(0, 600), Rotation::Deg0);
        assert_eq!(result, Err(TransformError::ImageNotReady));
    }

    #[test]
    fn test_invalid_frame() {
        let selection = SelectionRect::new(0.0, 0.0, 50.0, 50.0);
        let frame = DisplayFrame::new(0.0, 0.0, 0.0, 300.0);
        let result = remap_selection(&selection, &frame, NATURAL, Rotation::Deg0);
        assert_eq!(result, Err(TransformError::InvalidFrame));
    }

    #[test]
    fn test_display_to_source() {
        assert_eq!(display_to_source(Point::new(100.5, 50.0), &frame(), NATURAL), Ok((201, 100)));
        // The far edge maps to the last pixel, not one past it.
        assert_eq!(display_to_source(Point::new(400.0, 300.0), &frame(), NATURAL), Ok((799, 599)));
        assert!(matches!(
            display_to_source(Point::new(401.0, 10.0), &frame(), NATURAL),
            Err(TransformError::PointOutsideFrame { .. })
        ));
    }

    #[test]
    fn test_source_rect_fits_within() {
        assert!(SourceRect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!SourceRect::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!SourceRect::new(0, 0, 0, 10).fits_within(10, 10));
        assert!(!SourceRect::new(u32::MAX, 0, 2, 1).fits_within(10, 10));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rotation_strategy() -> impl Strategy<Value = Rotation> {
        (0usize..4).prop_map(|i| Rotation::ALL[i])
    }

    proptest! {
        /// Property: rotating a point by r and back by (360 - r) % 360
        /// returns it within a pixel.
        #[test]
        fn prop_rotation_round_trip(
            (width, height) in (1u32..4000, 1u32..4000),
            (fx, fy) in (0.0f64..=1.0, 0.0f64..=1.0),
            rotation in rotation_strategy(),
        ) {
            let size = ImageSize::new(width, height);
            let point = Point::new(fx * f64::from(width), fy * f64::from(height));

            let there = rotate_point(point, size, rotation);
            let back = rotate_point(there, rotation.rotated_size(size), rotation.inverse());

            prop_assert!((back.x - point.x).abs() <= 1.0);
            prop_assert!((back.y - point.y).abs() <= 1.0);
        }

        /// Property: the remapped rect always lies inside the rotated canvas.
        #[test]
        fn prop_remap_inside_rotated_canvas(
            (width, height) in (1u32..3000, 1u32..3000),
            (fw, fh) in (20.0f64..1000.0, 20.0f64..1000.0),
            (rx, ry, rw, rh) in (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0),
            rotation in rotation_strategy(),
        ) {
            let frame = DisplayFrame::new(0.0, 0.0, fw, fh);
            let w = (rw * fw).max(1.0);
            let h = (rh * fh).max(1.0);
            let selection = SelectionRect::new(rx * (fw - w), ry * (fh - h), w, h);
            let natural = ImageSize::new(width, height);

            let rect = remap_selection(&selection, &frame, natural, rotation).unwrap();
            let canvas = rotation.rotated_size(natural);
            prop_assert!(rect.fits_within(canvas.width, canvas.height));
        }

        /// Property: remapping is deterministic.
        #[test]
        fn prop_remap_is_deterministic(
            (x, y) in (0.0f64..300.0, 0.0f64..200.0),
            rotation in rotation_strategy(),
        ) {
            let frame = DisplayFrame::new(0.0, 0.0, 400.0, 300.0);
            let selection = SelectionRect::new(x, y, 50.0, 50.0);
            let a = remap_selection(&selection, &frame, ImageSize::new(800, 600), rotation);
            let b = remap_selection(&selection, &frame, ImageSize::new(800, 600), rotation);
            prop_assert_eq!(a, b);
        }
    }
}
