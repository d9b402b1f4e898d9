//! WASM bindings for the rotate/flip tool and the color picker.

use pixeltools_core::color::{pick_color as core_pick_color, PickedColor};
use pixeltools_core::geometry::{DisplayFrame, Point};
use pixeltools_core::transform::{apply_orientation as core_orientation, Flip, Rotation};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsRasterImage};

pub(crate) fn rotation_from_degrees(degrees: i32) -> Result<Rotation, JsValue> {
    Rotation::from_degrees(degrees)
        .ok_or_else(|| JsValue::from_str(&format!("Rotation must be a multiple of 90, got {degrees}")))
}

/// Rotate clockwise by a multiple of 90 degrees (negative values turn left).
#[wasm_bindgen]
pub fn rotate_image(image: &JsRasterImage, degrees: i32) -> Result<JsRasterImage, JsValue> {
    apply_orientation(image, degrees, false, false)
}

/// Mirror, then rotate clockwise by `degrees`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Rotate right and mirror left-to-right
/// const out = apply_orientation(image, 90, true, false);
/// ```
#[wasm_bindgen]
pub fn apply_orientation(
    image: &JsRasterImage,
    degrees: i32,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> Result<JsRasterImage, JsValue> {
    let rotation = rotation_from_degrees(degrees)?;
    let flip = Flip {
        horizontal: flip_horizontal,
        vertical: flip_vertical,
    };
    Ok(JsRasterImage::from_buffer(core_orientation(image.buffer(), rotation, flip)))
}

/// A color read by the picker.
#[wasm_bindgen]
pub struct JsPickedColor {
    inner: PickedColor,
}

#[wasm_bindgen]
impl JsPickedColor {
    #[wasm_bindgen(getter)]
    pub fn r(&self) -> u8 {
        self.inner.r
    }

    #[wasm_bindgen(getter)]
    pub fn g(&self) -> u8 {
        self.inner.g
    }

    #[wasm_bindgen(getter)]
    pub fn b(&self) -> u8 {
        self.inner.b
    }

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.inner.a
    }

    /// `#rrggbb`
    #[wasm_bindgen(getter)]
    pub fn hex(&self) -> String {
        self.inner.to_hex()
    }

    /// `rgb(r, g, b)`
    #[wasm_bindgen(getter)]
    pub fn rgb(&self) -> String {
        self.inner.to_rgb_string()
    }

    /// `hsl(h, s%, l%)`
    #[wasm_bindgen(getter)]
    pub fn hsl(&self) -> String {
        self.inner.to_hsl_string()
    }
}

/// Read the pixel shown under display point `(x, y)` when `image` is drawn
/// into the frame at `(left, top)` with size `width x height`.
#[wasm_bindgen]
pub fn pick_color(
    image: &JsRasterImage,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x: f64,
    y: f64,
) -> Result<JsPickedColor, JsValue> {
    let frame = DisplayFrame::new(left, top, width, height);
    core_pick_color(image.buffer(), &frame, Point::new(x, y))
        .map(|inner| JsPickedColor { inner })
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixeltools_core::decode::RasterBuffer;

    fn test_image(width: u32, height: u32) -> JsRasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        JsRasterImage::from_buffer(RasterBuffer::new(width, height, pixels))
    }

    #[test]
    fn test_rotate_90_swaps_dimensions() {
        let img = test_image(100, 50);
        let out = rotate_image(&img, 90).ok().unwrap();
        assert_eq!((out.width(), out.height()), (50, 100));
    }

    #[test]
    fn test_rotate_negative_turns_left() {
        let img = test_image(6, 4);
        let left = rotate_image(&img, -90).ok().unwrap();
        let three_right = rotate_image(&img, 270).ok().unwrap();
        assert_eq!(left.pixels(), three_right.pixels());
    }

    #[test]
    fn test_flip_only() {
        let img = test_image(3, 1);
        let out = apply_orientation(&img, 0, true, false).ok().unwrap();
        assert_eq!(&out.pixels()[..4], &[2, 0, 0, 255]);
    }

    #[test]
    fn test_pick_color() {
        let img = test_image(10, 10);
        let color = pick_color(&img, 0.0, 0.0, 100.0, 100.0, 55.0, 25.0).ok().unwrap();
        assert_eq!((color.r(), color.g(), color.b(), color.a()), (5, 2, 0, 255));
        assert_eq!(color.hex(), "#050200");
        assert_eq!(color.rgb(), "rgb(5, 2, 0)");
    }
}
