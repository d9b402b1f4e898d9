//! Image decoding and resizing.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG and WebP bytes into an RGBA [`RasterBuffer`]
//! - Honouring EXIF orientation so natural sizes match the rendered element
//! - Resizing with an explicit [`Fit`] strategy
//!
//! # Architecture
//!
//! Everything here is synchronous and single-threaded. The browser host
//! calls into it from a worker and owns any asynchrony around the call.

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
pub use resize::{resize, resize_to_fit, resize_with, Fit, ResizeOptions};
pub use types::{DecodeError, FilterType, Orientation, RasterBuffer, CHANNELS};
