//! Pixeltools Core - client-side image tools
//!
//! This crate holds everything the browser toolkit computes: the crop box
//! geometry, rotation-aware mapping of a selection into source pixels, the
//! raster compositor, and the convert, resize, compress, collage and color
//! picker tools built on the same raster type and encoders.
//!
//! Nothing here touches browser APIs; `pixeltools-wasm` exposes it to
//! JavaScript.

pub mod collage;
pub mod color;
pub mod compress;
pub mod config;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod pipeline;
pub mod session;
pub mod transform;

pub use collage::{build_collage, CollageError, CollageLayout, CollageOptions, MAX_CANVAS_DIMENSION};
pub use color::{pick_color, PickedColor};
pub use compress::{compress, CompressOptions, CompressedImage};
pub use config::{EditorConfig, Preferences};
pub use decode::{decode_image, resize_with, DecodeError, Fit, FilterType, RasterBuffer, ResizeOptions};
pub use encode::{encode, EncodeError, OutputFormat, DEFAULT_QUALITY};
pub use geometry::{
    AspectLock, DisplayFrame, GeometryError, GestureMode, Handle, ImageSize, Point, SelectionRect,
};
pub use pipeline::{
    convert, crop_and_encode, encode_image, ConvertError, ConvertOptions, CropError, CropOutput,
    EncodedImage,
};
pub use session::{ApplyTicket, CropSession};
pub use transform::{apply_orientation, remap_selection, Flip, Rotation, SourceRect, TransformError};
