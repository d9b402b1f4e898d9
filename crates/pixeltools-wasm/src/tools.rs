//! WASM bindings for the convert, compress and collage tools, plus the
//! editor view preferences.

use pixeltools_core::collage::{build_collage, CollageOptions};
use pixeltools_core::compress::{compress, CompressOptions, CompressedImage};
use pixeltools_core::config::{EditorConfig, Preferences};
use pixeltools_core::decode::RasterBuffer;
use pixeltools_core::pipeline::{convert, ConvertOptions};
use wasm_bindgen::prelude::*;

use crate::object_url::ObjectUrl;
use crate::types::{options_from_js, to_js_error, JsEncodedImage, JsRasterImage};

/// Decode, optionally resize, and re-encode a file.
///
/// `options` is `{ format?, quality?, resize?: { width?, height?, fit?, filter? } }`.
#[wasm_bindgen]
pub fn convert_image(bytes: &[u8], options: JsValue) -> Result<JsEncodedImage, JsValue> {
    let options: ConvertOptions = options_from_js(options)?;
    convert(bytes, &options)
        .map(JsEncodedImage::from_encoded)
        .map_err(to_js_error)
}

/// Output of [`compress_image`].
#[wasm_bindgen]
pub struct JsCompressedImage {
    inner: CompressedImage,
}

#[wasm_bindgen]
impl JsCompressedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.image.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.image.height
    }

    /// Quality the bytes were actually encoded at.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.image.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.image.len()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.inner.image.bytes.clone()
    }

    /// Fraction saved relative to the original file size.
    pub fn savings_ratio(&self, original_len: usize) -> f64 {
        self.inner.savings_ratio(original_len)
    }

    pub fn object_url(&self) -> Result<ObjectUrl, JsValue> {
        ObjectUrl::create(&self.inner.image.bytes, self.inner.image.mime_type())
    }
}

/// Re-encode with `{ format?, quality?, maxDimension?, maxBytes? }`.
#[wasm_bindgen]
pub fn compress_image(image: &JsRasterImage, options: JsValue) -> Result<JsCompressedImage, JsValue> {
    let options: CompressOptions = options_from_js(options)?;
    compress(image.buffer(), &options)
        .map(|inner| JsCompressedImage { inner })
        .map_err(to_js_error)
}

/// Collects images for the collage tool.
///
/// ```typescript
/// const collage = new JsCollage();
/// images.forEach((img) => collage.add(img));
/// const out = collage.build({ layout: { type: 'grid', columns: 2 }, spacing: 8 });
/// ```
#[wasm_bindgen]
#[derive(Default)]
pub struct JsCollage {
    images: Vec<RasterBuffer>,
}

#[wasm_bindgen]
impl JsCollage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCollage {
        JsCollage::default()
    }

    /// Append a copy of `image`.
    pub fn add(&mut self, image: &JsRasterImage) {
        self.images.push(image.buffer().clone());
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// `options`: `{ layout?, spacing?, background?, cellWidth?, cellHeight?, filter? }`.
    pub fn build(&self, options: JsValue) -> Result<JsRasterImage, JsValue> {
        let options: CollageOptions = options_from_js(options)?;
        self.build_with(&options)
    }
}

impl JsCollage {
    pub(crate) fn build_with(&self, options: &CollageOptions) -> Result<JsRasterImage, JsValue> {
        build_collage(&self.images, options)
            .map(JsRasterImage::from_buffer)
            .map_err(to_js_error)
    }
}

/// Theme state. The host persists it (e.g. in localStorage) as JSON.
#[wasm_bindgen]
#[derive(Default)]
pub struct JsPreferences {
    inner: Preferences,
}

#[wasm_bindgen]
impl JsPreferences {
    #[wasm_bindgen(constructor)]
    pub fn new(dark_mode: bool) -> JsPreferences {
        JsPreferences {
            inner: Preferences { dark_mode },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn dark_mode(&self) -> bool {
        self.inner.dark_mode
    }

    /// "dark" or "light".
    #[wasm_bindgen(getter)]
    pub fn theme_name(&self) -> String {
        self.inner.theme_name().to_string()
    }

    /// Returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.inner.toggle_dark_mode();
        self.inner.dark_mode
    }

    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    pub fn from_json(value: JsValue) -> Result<JsPreferences, JsValue> {
        let inner: Preferences = options_from_js(value)?;
        Ok(JsPreferences { inner })
    }
}

/// The default `EditorConfig` as a plain object.
#[wasm_bindgen]
pub fn default_editor_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EditorConfig::default()).map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixeltools_core::encode::{encode, OutputFormat};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_convert_png_to_webp() {
        let png = encode(&RasterBuffer::filled(8, 8, [0, 0, 0, 255]), OutputFormat::Png, 90).unwrap();
        let options = serde_wasm_bindgen::to_value(&ConvertOptions {
            format: OutputFormat::WebP,
            ..ConvertOptions::default()
        })
        .unwrap();
        let out = convert_image(&png, options).unwrap();
        assert_eq!(out.mime_type(), "image/webp");
    }

    #[wasm_bindgen_test]
    fn test_compress_with_default_options() {
        let img = JsRasterImage::from_buffer(RasterBuffer::filled(8, 8, [0, 0, 0, 255]));
        let out = compress_image(&img, JsValue::UNDEFINED).unwrap();
        assert_eq!(out.mime_type(), "image/jpeg");
    }

    #[wasm_bindgen_test]
    fn test_empty_collage_errors() {
        assert!(JsCollage::new().build(JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_preferences_json_round_trip() {
        let prefs = JsPreferences::new(true);
        let restored = JsPreferences::from_json(prefs.to_json().unwrap()).unwrap();
        assert!(restored.dark_mode());
    }

    #[wasm_bindgen_test]
    fn test_default_editor_config() {
        assert!(default_editor_config().unwrap().is_object());
    }
}
