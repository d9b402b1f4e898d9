//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core raster and encoded-image types and handle the
//! conversion between Rust and JavaScript data representations.

use std::fmt::Display;

use pixeltools_core::decode::{FilterType, RasterBuffer, CHANNELS};
use pixeltools_core::encode::OutputFormat;
use pixeltools_core::geometry::{GestureMode, Handle};
use pixeltools_core::pipeline::EncodedImage;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::object_url::ObjectUrl;

/// A decoded RGBA image for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`, which can be wrapped in an `ImageData`
/// directly.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterBuffer,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create an image from RGBA pixel data (4 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterImage, JsValue> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self::from_buffer(RasterBuffer::new(width, height, pixels)))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsRasterImage {
    pub(crate) fn from_buffer(inner: RasterBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn buffer(&self) -> &RasterBuffer {
        &self.inner
    }
}

/// Encoded output (PNG/JPEG/WebP bytes) plus its dimensions and type.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// File extension without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.len()
    }

    /// The encoded bytes as Uint8Array (a copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// `file_name` with its extension replaced by this image's.
    pub fn file_name(&self, file_name: &str) -> String {
        self.inner.format.rename(file_name)
    }

    /// Create a `blob:` URL for downloading. The URL is revoked when the
    /// returned object is freed.
    pub fn object_url(&self) -> Result<ObjectUrl, JsValue> {
        ObjectUrl::create(&self.inner.bytes, self.inner.mime_type())
    }
}

impl JsEncodedImage {
    pub(crate) fn from_encoded(inner: EncodedImage) -> Self {
        Self { inner }
    }

    pub(crate) fn encoded(&self) -> &EncodedImage {
        &self.inner
    }
}

/// Map any displayable error to a JavaScript string value.
pub(crate) fn to_js_error<E: Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deserialize an options object; `undefined` and `null` give the defaults.
pub(crate) fn options_from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))
}

/// Accepts a MIME type ("image/webp") or an extension ("jpg", ".png").
pub(crate) fn parse_format(name: &str) -> Option<OutputFormat> {
    OutputFormat::from_mime(name).or_else(|| OutputFormat::from_extension(name))
}

pub(crate) fn format_from_js(name: &str) -> Result<OutputFormat, JsValue> {
    parse_format(name).ok_or_else(|| JsValue::from_str(&format!("Unsupported output format: {name}")))
}

/// "move" or a handle name such as "top-left" or "bottom".
pub(crate) fn parse_gesture_mode(name: &str) -> Option<GestureMode> {
    let handle = match name {
        "move" => return Some(GestureMode::Move),
        "top-left" => Handle::TopLeft,
        "top" => Handle::Top,
        "top-right" => Handle::TopRight,
        "right" => Handle::Right,
        "bottom-right" => Handle::BottomRight,
        "bottom" => Handle::Bottom,
        "bottom-left" => Handle::BottomLeft,
        "left" => Handle::Left,
        _ => return None,
    };
    Some(GestureMode::Resize(handle))
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_image_accessors() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(10, 5, [1, 2, 3, 4]));
        assert_eq!(img.width(), 10);
        assert_eq!(img.height(), 5);
        assert_eq!(img.byte_length(), 200);
        assert_eq!(&img.pixels()[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_raster_image_constructor_accepts_matching_length() {
        let img = JsRasterImage::new(2, 2, vec![0; 16]).ok().unwrap();
        assert_eq!(img.buffer().dimensions(), (2, 2));
    }

    #[test]
    fn test_encoded_image_accessors() {
        let img = JsEncodedImage::from_encoded(EncodedImage {
            bytes: vec![1, 2, 3],
            width: 4,
            height: 3,
            format: OutputFormat::Jpeg,
        });
        assert_eq!(img.mime_type(), "image/jpeg");
        assert_eq!(img.extension(), "jpg");
        assert_eq!(img.byte_length(), 3);
        assert_eq!(img.file_name("holiday.png"), "holiday.jpg");
        assert_eq!(img.encoded().width, 4);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("image/webp"), Some(OutputFormat::WebP));
        assert_eq!(parse_format("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(parse_format(".png"), Some(OutputFormat::Png));
        assert_eq!(parse_format("image/gif"), None);
    }

    #[test]
    fn test_parse_gesture_mode() {
        assert_eq!(parse_gesture_mode("move"), Some(GestureMode::Move));
        assert_eq!(
            parse_gesture_mode("bottom-right"),
            Some(GestureMode::Resize(Handle::BottomRight))
        );
        assert_eq!(parse_gesture_mode("middle"), None);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(99), FilterType::Bilinear);
    }
}
