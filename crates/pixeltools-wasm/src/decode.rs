//! Image decoding and resizing WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_image } from '@pixeltools/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const thumb = resize_image(image, { width: 320, fit: 'crop' });
//! ```

use pixeltools_core::decode::{self, ResizeOptions};
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, options_from_js, to_js_error, JsRasterImage};

/// Decode PNG, JPEG or WebP bytes into an RGBA image.
///
/// EXIF orientation is applied, so the result has the dimensions the
/// browser shows for the same file.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_buffer)
        .map_err(to_js_error)
}

/// Resize with an options object: `{ width?, height?, fit?, filter? }` where
/// `fit` is "max", "crop" or "scale" and `filter` is "nearest", "bilinear"
/// or "lanczos3".
#[wasm_bindgen]
pub fn resize_image(image: &JsRasterImage, options: JsValue) -> Result<JsRasterImage, JsValue> {
    let options: ResizeOptions = options_from_js(options)?;
    decode::resize_with(image.buffer(), &options)
        .map(JsRasterImage::from_buffer)
        .map_err(to_js_error)
}

/// Resize to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(image: &JsRasterImage, width: u32, height: u32, filter: u8) -> Result<JsRasterImage, JsValue> {
    decode::resize(image.buffer(), width, height, filter_from_u8(filter))
        .map(JsRasterImage::from_buffer)
        .map_err(to_js_error)
}

/// Shrink so the longest edge is at most `max_edge`, preserving aspect ratio.
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsRasterImage, max_edge: u32, filter: u8) -> Result<JsRasterImage, JsValue> {
    decode::resize_to_fit(image.buffer(), max_edge, filter_from_u8(filter))
        .map(JsRasterImage::from_buffer)
        .map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixeltools_core::decode::RasterBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_invalid_bytes() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_image_with_options() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(40, 20, [0, 0, 0, 255]));
        let options = serde_wasm_bindgen::to_value(&ResizeOptions {
            width: Some(10),
            height: Some(10),
            fit: decode::Fit::Crop,
            ..ResizeOptions::default()
        })
        .unwrap();
        let out = resize_image(&img, options).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
    }

    #[wasm_bindgen_test]
    fn test_resize_zero_dimension_errors() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(4, 4, [0, 0, 0, 255]));
        assert!(resize(&img, 0, 4, 1).is_err());
    }
}
