//! Encoding and crop-and-encode WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { crop_and_encode } from '@pixeltools/wasm';
//!
//! const out = crop_and_encode(image, {
//!   selection: { x: 200, y: 100, width: 200, height: 200 },
//!   frame: { left: 0, top: 0, width: 800, height: 600 },
//!   rotation: 90,
//!   format: 'image/png',
//! });
//! const url = out.object_url();
//! link.href = url.url;
//! ```

use pixeltools_core::encode::DEFAULT_QUALITY;
use pixeltools_core::geometry::{DisplayFrame, ImageSize, SelectionRect};
use pixeltools_core::pipeline;
use pixeltools_core::transform::Rotation;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::types::{format_from_js, to_js_error, JsEncodedImage, JsRasterImage};

/// Encode an image to the format named by a MIME type or extension.
///
/// `quality` (1-100) is used by JPEG only.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterImage, format: &str, quality: u8) -> Result<JsEncodedImage, JsValue> {
    let format = format_from_js(format)?;
    pipeline::encode_image(image.buffer(), format, quality)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}

/// Everything `crop_and_encode` needs besides the pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CropRequest {
    pub selection: SelectionRect,
    pub frame: DisplayFrame,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_format() -> String {
    "image/png".to_string()
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl CropRequest {
    pub(crate) fn run(&self, image: &JsRasterImage) -> Result<JsEncodedImage, JsValue> {
        let format = format_from_js(&self.format)?;
        let buffer = image.buffer();
        pipeline::crop_and_encode(
            &self.selection,
            &self.frame,
            ImageSize::new(buffer.width, buffer.height),
            self.rotation,
            buffer,
            format,
            self.quality,
        )
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
    }
}

/// Crop a natural image to a display-space selection and encode it.
///
/// `request` is `{ selection, frame, rotation?, format?, quality? }`;
/// rotation defaults to 0 and format to "image/png".
#[wasm_bindgen]
pub fn crop_and_encode(image: &JsRasterImage, request: JsValue) -> Result<JsEncodedImage, JsValue> {
    let request: CropRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop request: {e}")))?;
    request.run(image)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixeltools_core::decode::RasterBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_unsupported_format() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(2, 2, [0, 0, 0, 255]));
        assert!(encode_image(&img, "image/gif", 90).is_err());
    }

    #[wasm_bindgen_test]
    fn test_crop_and_encode_rotated() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(600, 800, [9, 9, 9, 255]));
        let request = serde_wasm_bindgen::to_value(&CropRequest {
            selection: SelectionRect::new(125.0, 175.0, 50.0, 50.0),
            frame: DisplayFrame::new(0.0, 0.0, 300.0, 400.0),
            rotation: Rotation::Deg90,
            format: "image/webp".to_string(),
            quality: 90,
        })
        .unwrap();
        let out = crop_and_encode(&img, request).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert_eq!(out.mime_type(), "image/webp");
    }

    #[wasm_bindgen_test]
    fn test_crop_and_encode_rejects_bad_request() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(4, 4, [0, 0, 0, 255]));
        assert!(crop_and_encode(&img, JsValue::from_str("nope")).is_err());
    }
}
