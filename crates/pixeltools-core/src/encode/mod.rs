//! Raster encoding for every tool's output.
//!
//! This module provides functionality for:
//! - Naming output formats by MIME type or file extension ([`OutputFormat`])
//! - Encoding RGBA buffers to PNG, JPEG (with quality) and lossless WebP
//!
//! # Examples
//!
//! ```ignore
//! use pixeltools_core::encode::{encode, OutputFormat};
//!
//! let bytes = encode(&buffer, OutputFormat::Jpeg, 85)?;
//! ```

mod format;
mod raster;

pub use format::OutputFormat;
pub use raster::{encode, EncodeError, DEFAULT_QUALITY};
