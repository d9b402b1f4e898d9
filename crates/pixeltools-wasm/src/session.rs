//! WASM bindings for the interactive crop session.
//!
//! # Usage
//!
//! ```typescript
//! const session = new JsCropSession(frame.left, frame.top, frame.width, frame.height,
//!                                   img.naturalWidth, img.naturalHeight, { aspectLock: 'square' });
//! handle.onpointerdown = (e) => session.pointer_down('bottom-right', e.clientX, e.clientY);
//! window.onpointermove = (e) => render(session.pointer_move(e.clientX, e.clientY));
//! window.onpointerup = () => session.pointer_up();
//! ```

use pixeltools_core::config::EditorConfig;
use pixeltools_core::geometry::{DisplayFrame, ImageSize, Point, SelectionRect};
use pixeltools_core::session::{ApplyTicket, CropSession};
use wasm_bindgen::prelude::*;

use crate::types::{format_from_js, options_from_js, parse_gesture_mode, to_js_error, JsEncodedImage, JsRasterImage};

/// Selection rectangle in display pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsSelection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<SelectionRect> for JsSelection {
    fn from(rect: SelectionRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Handle for one apply request; see [`JsCropSession::begin_apply`].
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsApplyTicket {
    inner: ApplyTicket,
}

#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a session for an image of `natural_width x natural_height`
    /// drawn into the given frame. `config` is an optional `EditorConfig`
    /// object (`{ minSelectionSize, initialCoverage, aspectLock, ... }`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        natural_width: u32,
        natural_height: u32,
        config: JsValue,
    ) -> Result<JsCropSession, JsValue> {
        let config: EditorConfig = options_from_js(config)?;
        Self::with_config(
            DisplayFrame::new(left, top, width, height),
            ImageSize::new(natural_width, natural_height),
            config,
        )
    }

    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> JsSelection {
        self.inner.selection().into()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u16 {
        self.inner.rotation().degrees()
    }

    #[wasm_bindgen(getter)]
    pub fn dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// The session's configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(to_js_error)
    }

    /// `mode` is "move" or a handle name ("top-left", "top", ..., "left").
    pub fn pointer_down(&mut self, mode: &str, x: f64, y: f64) -> Result<(), JsValue> {
        let mode = parse_gesture_mode(mode).ok_or_else(|| JsValue::from_str(&format!("Unknown gesture: {mode}")))?;
        self.inner.pointer_down(mode, Point::new(x, y)).map_err(to_js_error)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> JsSelection {
        self.inner.pointer_move(Point::new(x, y)).into()
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    pub fn pointer_cancel(&mut self) {
        self.inner.pointer_cancel();
    }

    /// Returns the new rotation in degrees.
    pub fn rotate_left(&mut self) -> u16 {
        self.inner.rotate_left().degrees()
    }

    /// Returns the new rotation in degrees.
    pub fn rotate_right(&mut self) -> u16 {
        self.inner.rotate_right().degrees()
    }

    /// Call after the image is laid out again (window resize, zoom).
    pub fn set_frame(&mut self, left: f64, top: f64, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .set_frame(DisplayFrame::new(left, top, width, height))
            .map_err(to_js_error)
    }

    /// Crop and encode synchronously; the result is also kept as the latest.
    pub fn apply(&mut self, image: &JsRasterImage, format: &str, quality: u8) -> Result<JsEncodedImage, JsValue> {
        let format = format_from_js(format)?;
        self.inner
            .apply(image.buffer(), format, quality)
            .map(JsEncodedImage::from_encoded)
            .map_err(to_js_error)
    }

    /// Like `apply`, with the configured default format and quality.
    pub fn apply_default(&mut self, image: &JsRasterImage) -> Result<JsEncodedImage, JsValue> {
        self.inner
            .apply_default(image.buffer())
            .map(JsEncodedImage::from_encoded)
            .map_err(to_js_error)
    }

    /// Take a ticket before handing the crop to a worker. Earlier tickets
    /// become stale.
    pub fn begin_apply(&mut self) -> JsApplyTicket {
        JsApplyTicket {
            inner: self.inner.begin_apply(),
        }
    }

    /// Store a worker's result. Returns `false` if the ticket is stale.
    pub fn accept(&mut self, ticket: &JsApplyTicket, result: &JsEncodedImage) -> bool {
        self.inner.accept(ticket.inner, result.encoded().clone())
    }

    pub fn latest_result(&self) -> Option<JsEncodedImage> {
        self.inner.latest_result().cloned().map(JsEncodedImage::from_encoded)
    }
}

impl JsCropSession {
    pub(crate) fn with_config(
        frame: DisplayFrame,
        natural: ImageSize,
        config: EditorConfig,
    ) -> Result<JsCropSession, JsValue> {
        CropSession::new(frame, natural, config)
            .map(|inner| JsCropSession { inner })
            .map_err(to_js_error)
    }
}
