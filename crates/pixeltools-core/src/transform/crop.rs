//! Copying a pixel region out of a buffer.
//!
//! The region is in whole source pixels, as produced by
//! [`remap_selection`](super::remap_selection). No scaling or resampling
//! happens here: the output is exactly `rect.width x rect.height`.

use super::{SourceRect, TransformError};
use crate::decode::{RasterBuffer, CHANNELS};

/// Copy `rect` out of `buffer` into a freshly sized buffer.
///
/// # Errors
///
/// Returns `TransformError::RegionOutOfBounds` if the region is empty or
/// extends past the buffer.
///
/// # Example
///
/// ```ignore
/// let out = crop_buffer(&rotated, SourceRect::new(200, 100, 200, 200))?;
/// assert_eq!(out.dimensions(), (200, 200));
/// ```
pub fn crop_buffer(buffer: &RasterBuffer, rect: SourceRect) -> Result<RasterBuffer, TransformError> {
    if !rect.fits_within(buffer.width, buffer.height) || !buffer.is_consistent() {
        return Err(TransformError::RegionOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            buffer_width: buffer.width,
            buffer_height: buffer.height,
        });
    }

    // Fast path: full-buffer region returns a clone
    if rect.x == 0 && rect.y == 0 && rect.width == buffer.width && rect.height == buffer.height {
        return Ok(buffer.clone());
    }

    let src_stride = buffer.width as usize * CHANNELS;
    let row_len = rect.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in 0..rect.height as usize {
        let start = (rect.y as usize + y) * src_stride + rect.x as usize * CHANNELS;
        output.extend_from_slice(&buffer.pixels[start..start + row_len]);
    }

    Ok(RasterBuffer::new(rect.width, rect.height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
