//! Rotation, mirroring, coordinate remapping and cropping.
//!
//! # Transform Order
//!
//! When the crop tool applies a selection:
//! 1. The display selection is remapped into the rotated source canvas
//! 2. The source is rendered rotated
//! 3. The remapped region is copied out
//! 4. The result is encoded
//!
//! # Coordinate System
//!
//! - Rotations are quarter turns, clockwise in y-down raster space
//! - Crop regions are whole source pixels
//! - Origin is top-left corner

mod crop;
mod remap;
mod rotation;

pub use crop::crop_buffer;
pub use remap::{display_to_source, remap_selection, rotate_point, SourceRect, TransformError};
pub use rotation::{apply_orientation, render_flipped, render_rotated, Flip, Rotation};
