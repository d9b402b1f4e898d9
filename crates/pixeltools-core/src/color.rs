//! The color picker: the pixel under a display point, formatted for CSS.

use serde::{Deserialize, Serialize};

use crate::decode::RasterBuffer;
use crate::geometry::{DisplayFrame, ImageSize, Point};
use crate::transform::{display_to_source, TransformError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PickedColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, lowercase. Alpha is not included.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)`
    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `hsl(h, s%, l%)` with whole-number components.
    pub fn to_hsl_string(&self) -> String {
        let (h, s, l) = self.to_hsl();
        format!("hsl({}, {}%, {}%)", h.round(), (s * 100.0).round(), (l * 100.0).round())
    }

    /// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return (0.0, 0.0, l);
        }

        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        ((h * 60.0) % 360.0, s, l)
    }
}

impl From<[u8; 4]> for PickedColor {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Read the pixel of `image` displayed under `point` when the image is
/// drawn into `frame`.
///
/// # Errors
///
/// `PointOutsideFrame` when the point misses the image, plus the errors of
/// [`display_to_source`].
pub fn pick_color(image: &RasterBuffer, frame: &DisplayFrame, point: Point) -> Result<PickedColor, TransformError> {
    let natural = ImageSize::new(image.width, image.height);
    let (x, y) = display_to_source(point, frame, natural)?;
    let rgba = image.pixel(x, y).ok_or(TransformError::RegionOutOfBounds {
        x,
        y,
        width: 1,
        height: 1,
        buffer_width: image.width,
        buffer_height: image.height,
    })?;
    Ok(rgba.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        let c = PickedColor::new(255, 128, 0, 255);
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(c.to_rgb_string(), "rgb(255, 128, 0)");
        assert_eq!(c.to_hsl_string(), "hsl(30, 100%, 50%)");
    }

    #[test]
    fn test_hsl_greys_and_primaries() {
        assert_eq!(PickedColor::new(0, 0, 0, 255).to_hsl_string(), "hsl(0, 0%, 0%)");
        assert_eq!(PickedColor::new(255, 255, 255, 255).to_hsl_string(), "hsl(0, 0%, 100%)");
        assert_eq!(PickedColor::new(0, 255, 0, 255).to_hsl_string(), "hsl(120, 100%, 50%)");
        assert_eq!(PickedColor::new(0, 0, 255, 255).to_hsl_string(), "hsl(240, 100%, 50%)");
        assert_eq!(PickedColor::new(255, 0, 255, 255).to_hsl_string(), "hsl(300, 100%, 50%)");
    }

    #[test]
    fn test_pick_through_scaled_frame() {
        // 4x2 image drawn at 40x20, offset by (100, 50).
        let mut pixels = Vec::new();
        for i in 0..8u8 {
            pixels.extend_from_slice(&[i, 0, 0, 255]);
        }
        let image = RasterBuffer::new(4, 2, pixels);
        let frame = DisplayFrame::new(100.0, 50.0, 40.0, 20.0);

        let c = pick_color(&image, &frame, Point::new(100.0, 50.0)).unwrap();
        assert_eq!(c.r, 0);
        let c = pick_color(&image, &frame, Point::new(135.0, 65.0)).unwrap();
        assert_eq!(c.r, 7);
        let c = pick_color(&image, &frame, Point::new(139.9, 59.9)).unwrap();
        assert_eq!(c.r, 3);
    }

    #[test]
    fn test_pick_outside_frame() {
        let image = RasterBuffer::filled(4, 4, [1, 2, 3, 255]);
        let frame = DisplayFrame::new(0.0, 0.0, 40.0, 40.0);
        assert!(matches!(
            pick_color(&image, &frame, Point::new(-1.0, 5.0)),
            Err(TransformError::PointOutsideFrame { .. })
        ));
    }
}
