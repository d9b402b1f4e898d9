//! Pixeltools WASM - WebAssembly bindings for Pixeltools
//!
//! This crate exposes the pixeltools-core tools to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for raster and encoded images
//! - `decode` - Decoding and resizing
//! - `encode` - Encoding and crop-and-encode
//! - `session` - The interactive crop session
//! - `transform` - Rotate/flip and the color picker
//! - `tools` - Convert, compress, collage and view preferences
//! - `object_url` - Scoped `blob:` URLs for downloads
//! - `logger` - `log` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropSession } from '@pixeltools/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsCropSession(0, 0, 400, 300, image.width, image.height);
//! const out = session.apply(image, 'image/png', 92);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod logger;
mod object_url;
mod session;
mod tools;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, resize, resize_image, resize_to_fit};
pub use encode::{crop_and_encode, encode_image};
pub use logger::set_log_level;
pub use object_url::ObjectUrl;
pub use session::{JsApplyTicket, JsCropSession, JsSelection};
pub use tools::{
    compress_image, convert_image, default_editor_config, JsCollage, JsCompressedImage, JsPreferences,
};
pub use transform::{apply_orientation, pick_color, rotate_image, JsPickedColor};
pub use types::{JsEncodedImage, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::info!("pixeltools {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
