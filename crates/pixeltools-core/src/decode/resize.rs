//! Image resizing for the resize and convert tools.
//!
//! Resizing is described by [`ResizeOptions`]: optional target dimensions plus
//! a [`Fit`] that says how the source aspect ratio relates to the target box.
//! All functions return new buffers without modifying the input.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::{DecodeError, FilterType, RasterBuffer};

/// How an image is fitted into a target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Shrink to fit inside the box preserving aspect ratio. Never enlarges.
    #[default]
    Max,
    /// Cover the box preserving aspect ratio, then center-crop to exactly the box.
    Crop,
    /// Stretch to exactly the box, ignoring aspect ratio.
    Scale,
}

/// Target dimensions and fitting strategy for a resize.
///
/// A missing dimension is derived from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
    pub filter: FilterType,
}

impl ResizeOptions {
    pub fn new(width: Option<u32>, height: Option<u32>, fit: Fit) -> Self {
        Self {
            width,
            height,
            fit,
            filter: FilterType::default(),
        }
    }

    /// True when no target dimension is set and the image passes through.
    pub fn is_noop(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Resize an image according to `options`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` when a requested dimension is zero
/// or the source is empty.
pub fn resize_with(image: &RasterBuffer, options: &ResizeOptions) -> Result<RasterBuffer, DecodeError> {
    if options.is_noop() {
        return Ok(image.clone());
    }
    if image.is_empty() {
        return Err(DecodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let (box_w, box_h) = target_box(image.width, image.height, options.width, options.height)?;

    match options.fit {
        Fit::Max => {
            let (w, h) = calculate_contain_dimensions(image.width, image.height, box_w, box_h);
            if w >= image.width && h >= image.height {
                return Ok(image.clone());
            }
            resize(image, w, h, options.filter)
        }
        Fit::Scale => resize(image, box_w, box_h, options.filter),
        Fit::Crop => {
            if image.width == box_w && image.height == box_h {
                return Ok(image.clone());
            }
            let rgba = to_rgba(image)?;
            let filled = DynamicImage::ImageRgba8(rgba).resize_to_fill(
                box_w,
                box_h,
                options.filter.to_image_filter(),
            );
            Ok(RasterBuffer::from_rgba_image(filled.into_rgba8()))
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &RasterBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterBuffer, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba = to_rgba(image)?;
    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    Ok(RasterBuffer::from_rgba_image(resized))
}

/// Resize an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio. Images that already fit are returned unchanged.
pub fn resize_to_fit(
    image: &RasterBuffer,
    max_edge: u32,
    filter: FilterType,
) -> Result<RasterBuffer, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: max_edge,
            height: max_edge,
        });
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (w, h) = calculate_contain_dimensions(image.width, image.height, max_edge, max_edge);
    resize(image, w, h, filter)
}

fn to_rgba(image: &RasterBuffer) -> Result<image::RgbaImage, DecodeError> {
    image.to_rgba_image().ok_or_else(|| {
        DecodeError::DecodeFailed(format!(
            "pixel buffer does not match {}x{}",
            image.width, image.height
        ))
    })
}

/// Fill in a missing target dimension from the source aspect ratio.
fn target_box(
    src_w: u32,
    src_h: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(u32, u32), DecodeError> {
    let ratio = src_w as f64 / src_h as f64;
    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, ((w as f64 / ratio).round() as u32).max(1)),
        (None, Some(h)) => (((h as f64 * ratio).round() as u32).max(1), h),
        (None, None) => (src_w, src_h),
    };
    if w == 0 || h == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    Ok((w, h))
}

/// Largest dimensions with the source aspect ratio that fit in `box_w x box_h`.
fn calculate_contain_dimensions(width: u32, height: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = (box_w as f64 / width as f64).min(box_h as f64 / height as f64);
    let new_w = (width as f64 * scale).round() as u32;
    let new_h = (height as f64 * scale).round() as u32;
    (new_w.clamp(1, box_w.max(1)), new_h.clamp(1, box_h.max(1)))
}
