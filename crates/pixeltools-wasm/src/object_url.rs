//! Scoped browser object URLs for encoded output.
//!
//! An [`ObjectUrl`] owns a `blob:` URL created for a download. The URL is
//! revoked when the value is dropped (including when JavaScript calls
//! `free()`), or earlier through [`ObjectUrl::revoke`]. A URL is only
//! handed out once it exists, so failures while creating it leave nothing
//! behind.

use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

#[wasm_bindgen]
pub struct ObjectUrl {
    url: Option<String>,
}

impl ObjectUrl {
    /// Wrap `bytes` in a Blob of type `mime` and create a URL for it.
    pub(crate) fn create(bytes: &[u8], mime: &str) -> Result<ObjectUrl, JsValue> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);

        let options = BlobPropertyBag::new();
        options.set_type(mime);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;
        log::debug!("created object URL for {} bytes of {mime}", bytes.len());

        Ok(ObjectUrl { url: Some(url) })
    }
}

#[wasm_bindgen]
impl ObjectUrl {
    /// The `blob:` URL, or `undefined` once revoked.
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> Option<String> {
        self.url.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn revoked(&self) -> bool {
        self.url.is_none()
    }

    /// Revoke the URL now. Revoking twice is a no-op.
    pub fn revoke(&mut self) -> Result<(), JsValue> {
        match self.url.take() {
            Some(url) => Url::revoke_object_url(&url),
            None => Ok(()),
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(err) = self.revoke() {
            log::warn!("failed to revoke object URL: {err:?}");
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_create_and_revoke() {
        let mut url = ObjectUrl::create(&[0x89, b'P', b'N', b'G'], "image/png").unwrap();
        assert!(url.url().unwrap().starts_with("blob:"));
        assert!(!url.revoked());

        url.revoke().unwrap();
        assert!(url.revoked());
        assert!(url.url().is_none());

        // Second revoke is a no-op.
        url.revoke().unwrap();
    }

    #[wasm_bindgen_test]
    fn test_drop_revokes() {
        let url = ObjectUrl::create(b"abc", "image/jpeg").unwrap();
        assert!(url.url().is_some());
        drop(url);
    }
}
