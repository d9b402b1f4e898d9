//! Raster encoding using the `image` crate's encoders.
//!
//! JPEG has no alpha channel, so transparent pixels are composited over
//! white before encoding. WebP is written losslessly; its quality argument is
//! accepted for a uniform signature and ignored.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use super::OutputFormat;
use crate::decode::{RasterBuffer, CHANNELS};

/// Quality used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 92;

/// Errors that can occur while producing encoded bytes.
///
/// Every variant means "could not produce image"; callers may retry with a
/// different format or smaller dimensions.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The encoder itself failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an RGBA buffer.
///
/// # Arguments
///
/// * `buffer` - RGBA pixels to encode
/// * `format` - Target format
/// * `quality` - 1-100, used by JPEG only; out-of-range values are clamped
///
/// # Errors
///
/// Returns an error for zero-area buffers, mismatched pixel data, or an
/// encoder failure.
pub fn encode(buffer: &RasterBuffer, format: OutputFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let mut out = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Png => PngEncoder::new(&mut out).write_image(
            &buffer.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(&buffer.pixels);
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut out).write_image(
            &buffer.pixels,
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = out.into_inner();
    if bytes.is_empty() {
        return Err(EncodeError::EncodingFailed("encoder produced no data".to_string()));
    }

    log::debug!(
        "encoded {width}x{height} as {} ({} bytes)",
        format.mime_type(),
        bytes.len()
    );
    Ok(bytes)
}

/// Composite straight-alpha RGBA over opaque white, producing RGB.
fn flatten_onto_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for &channel in &px[..3] {
            let blended = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}
